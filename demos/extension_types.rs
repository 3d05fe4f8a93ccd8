//! Keywords, sets, dates and user-defined tags.
//!
//! Run with: cargo run --example extension_types

use chrono::Utc;
use serde_transit::handlers::{Handler, Representation};
use serde_transit::{transit, writer, Format, Result, TransitSet, TransitValue, WriterOptions};
use std::borrow::Cow;

/// Writes `point` values as `{"~#point":[x,y]}`.
struct PointHandler;

impl Handler for PointHandler {
    fn tag<'a>(&self, _value: &'a TransitValue) -> Result<Cow<'a, str>> {
        Ok(Cow::Borrowed("point"))
    }

    fn rep<'a>(&self, value: &'a TransitValue) -> Result<Representation<'a>> {
        match value {
            TransitValue::Custom(c) => Ok(Representation::Borrowed(&c.payload)),
            other => Err(serde_transit::Error::unsupported_value(other.type_key())),
        }
    }
}

fn point(x: i64, y: i64) -> TransitValue {
    TransitValue::custom("point", transit!([x, y]))
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut w = writer(Format::Json, WriterOptions::default());

    let roles: TransitSet = ["admin", "ops"].into_iter().map(TransitValue::from).collect();
    let record = transit!({
        "status": TransitValue::keyword("active"),
        "roles": TransitValue::Set(roles),
        "joined": TransitValue::Date(Utc::now()),
        "avatar": TransitValue::Binary(vec![0x89, 0x50, 0x4e, 0x47]),
        "karma": u64::MAX
    });
    println!("Record:\n{}\n", w.write(&record)?);

    // Custom values need a handler first
    match w.write(&point(1, 2)) {
        Ok(doc) => println!("Unexpected success: {}", doc),
        Err(e) => println!("Before registering: {}", e),
    }

    w.register("point", PointHandler);
    println!("After registering: {}", w.write(&transit!([point(1, 2), point(3, 4)]))?);

    Ok(())
}

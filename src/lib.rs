//! # serde_transit
//!
//! A writer for the Transit data interchange format, JSON encoding.
//!
//! ## What is Transit?
//!
//! Transit carries values richer than JSON (keywords, symbols, sets, dates,
//! big integers, binary data, maps with non-string keys, user-defined types)
//! through a plain JSON document. Richer values are spelled with a short tag:
//! scalars become strings like `"~i9007199254740993"` or `"~:name"`, and
//! composites become single-entry maps like `{"~#set":[1,2]}`. Repeated map
//! keys and tags are replaced by short cache codes (`"^0"`), which keeps
//! documents with many similar records small.
//!
//! ## Key Features
//!
//! - **Handler registry**: every value kind is written by a [`Handler`];
//!   register your own to add extension types
//! - **Serde compatible**: any `#[derive(Serialize)]` type can be written
//! - **Rolling cache**: repeated keys and tags are written once
//! - **Strict structure**: an explicit state machine places every separator;
//!   misuse is an error, never malformed output
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Serialize;
//! use serde_transit::to_string;
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let users = vec![
//!     User { id: 1, name: "Alice".to_string(), active: true },
//!     User { id: 2, name: "Bob".to_string(), active: false },
//! ];
//!
//! let doc = to_string(&users).unwrap();
//! assert_eq!(
//!     doc,
//!     r#"[{"id":1,"name":"Alice","active":true},{"id":2,"^0":"Bob","^1":false}]"#
//! );
//! ```
//!
//! ### Extension Values
//!
//! ```rust
//! use serde_transit::{transit, writer, Format, TransitSet, TransitValue, WriterOptions};
//!
//! let mut w = writer(Format::Json, WriterOptions::default());
//!
//! let tags: TransitSet = ["a", "b"].into_iter().map(TransitValue::from).collect();
//! let doc = w.write(&transit!({
//!     "kind": TransitValue::keyword("user"),
//!     "tags": TransitValue::Set(tags)
//! })).unwrap();
//!
//! assert_eq!(doc, r#"{"kind":"~:user","tags":{"~#set":["a","b"]}}"#);
//! ```
//!
//! ### Top-Level Scalars
//!
//! A bare scalar is wrapped in a quote so the document is always a JSON
//! array or object:
//!
//! ```rust
//! assert_eq!(serde_transit::to_string(&true).unwrap(), r#"{"~#'":true}"#);
//! ```
//!
//! ## Modules
//!
//! - [`writer`](mod@writer): the public [`Writer`]
//! - [`handlers`]: the [`Handler`] trait and built-in handlers
//! - [`emitter`]: the [`Marshaller`] trait and the JSON state machine
//! - [`cache`]: cache delegates
//! - [`value`] and [`map`]: the value model
//! - [`ser`]: the serde bridge

pub mod cache;
pub mod emitter;
pub mod error;
pub mod escape;
pub mod handlers;
pub mod macros;
pub mod map;
mod marshal;
pub mod options;
pub mod ser;
pub mod value;
pub mod writer;

pub use emitter::{JsonMarshaller, Marshaller};
pub use error::{Error, Result};
pub use handlers::{Handler, Handlers};
pub use map::{TransitMap, TransitSet};
pub use options::{Format, WriterOptions};
pub use ser::{to_value, TransitValueSerializer};
pub use value::{AsTag, Custom, TaggedValue, TransitValue, TypedArray};
pub use writer::Writer;

use serde::Serialize;
use std::io;

/// Creates a writer for `format`.
///
/// # Examples
///
/// ```rust
/// use serde_transit::{writer, Format, TransitValue, WriterOptions};
///
/// let mut w = writer(Format::Json, WriterOptions::default());
/// assert_eq!(w.write(&TransitValue::Array(vec![])).unwrap(), "[]");
/// ```
#[must_use]
pub fn writer(format: Format, options: WriterOptions) -> Writer {
    Writer::new(format, options)
}

/// Writes `value` with `writer`.
///
/// # Errors
///
/// See [`Writer::write`].
pub fn write(writer: &mut Writer, value: &TransitValue) -> Result<String> {
    writer.write(value)
}

/// Serialize any `T: Serialize` to a Transit JSON string.
///
/// # Examples
///
/// ```rust
/// use serde_transit::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let point = Point { x: 1, y: 2 };
/// assert_eq!(to_string(&point).unwrap(), r#"{"x":1,"y":2}"#);
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, WriterOptions::default())
}

/// Serialize any `T: Serialize` to a Transit JSON string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_transit::{to_string_with_options, WriterOptions};
///
/// let options = WriterOptions::new().with_prefer_strings(false);
/// assert_eq!(to_string_with_options(&[i64::MAX], options).unwrap(), "[9223372036854775807]");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: WriterOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Writer::new(Format::Json, options).write_serialize(value)
}

/// Serialize any `T: Serialize` to an I/O stream as Transit JSON.
///
/// # Examples
///
/// ```rust
/// use serde_transit::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec!["a", "b"]).unwrap();
/// assert_eq!(buffer, br#"["a","b"]"#);
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, WriterOptions::default())
}

/// Serialize any `T: Serialize` to an I/O stream with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: WriterOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let doc = to_string_with_options(value, options)?;
    writer
        .write_all(doc.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

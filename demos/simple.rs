//! Basic Transit serialization of serde types.
//!
//! Run with: cargo run --example simple

use serde::Serialize;
use serde_transit::{to_string, to_string_with_options, WriterOptions};
use std::error::Error;

#[derive(Debug, Serialize)]
struct User {
    id: u32,
    name: String,
    email: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            email: "alice@example.com".to_string(),
        },
        User {
            id: 43,
            name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
        },
    ];

    // Repeated keys become cache codes
    let transit = to_string(&users)?;
    println!("Transit output:\n{}\n", transit);

    let plain = to_string_with_options(&users, WriterOptions::new().with_caching(false))?;
    println!("Without caching:\n{}\n", plain);

    // Bare scalars are quoted so every document is an object or array
    println!("A lone boolean: {}", to_string(&true)?);

    Ok(())
}

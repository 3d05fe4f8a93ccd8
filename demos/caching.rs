//! How the rolling cache shrinks repetitive documents.
//!
//! Run with: cargo run --example caching

use serde::Serialize;
use serde_transit::{to_string, to_string_with_options, WriterOptions};
use std::error::Error;

#[derive(Serialize)]
struct Reading {
    sensor_id: String,
    temperature: f64,
    humidity: f64,
    status: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let readings: Vec<Reading> = (0..100u32)
        .map(|i| Reading {
            sensor_id: format!("sensor-{}", i % 5),
            temperature: 20.0 + f64::from(i % 10) * 0.5,
            humidity: 40.0 + f64::from(i % 7),
            status: "ok".to_string(),
        })
        .collect();

    let cached = to_string(&readings)?;
    let uncached = to_string_with_options(&readings, WriterOptions::new().with_caching(false))?;

    println!("First records: {}", &cached[..cached.len().min(160)]);
    println!();
    println!("With cache:    {} bytes", cached.len());
    println!("Without cache: {} bytes", uncached.len());
    println!(
        "Saved:         {:.1}%",
        100.0 * (1.0 - cached.len() as f64 / uncached.len() as f64)
    );

    Ok(())
}

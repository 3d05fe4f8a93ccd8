//! Configuration options for Transit writers.
//!
//! - [`Format`]: the target wire format
//! - [`WriterOptions`]: knobs that change how values are emitted
//!
//! ## Examples
//!
//! ```rust
//! use serde_transit::{to_string_with_options, WriterOptions};
//!
//! // Disable the rolling cache to get fully spelled-out keys
//! let options = WriterOptions::new().with_caching(false);
//! let json = to_string_with_options(&vec![1, 2, 3], options).unwrap();
//! assert_eq!(json, "[1,2,3]");
//! ```

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Default limit on container nesting before a write is aborted.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Target wire format of a writer.
///
/// Only the JSON variant is implemented; other Transit encodings are rejected
/// when parsed from a string.
///
/// # Examples
///
/// ```rust
/// use serde_transit::Format;
///
/// assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
/// assert!("msgpack".parse::<Format>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
}

impl Format {
    /// Returns the canonical name of this format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Format::Json),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Configuration options for a [`Writer`](crate::Writer).
///
/// # Examples
///
/// ```rust
/// use serde_transit::WriterOptions;
///
/// let options = WriterOptions::new()
///     .with_prefer_strings(false)
///     .with_max_depth(32);
/// assert!(options.caching);
/// assert_eq!(options.max_depth, 32);
/// ```
#[derive(Clone, Debug)]
pub struct WriterOptions {
    /// Write integers beyond the exact JSON range as `~i` strings, and
    /// single-character extension values through their string form.
    pub prefer_strings: bool,
    /// Replace repeated keys and tags with rolling cache codes.
    pub caching: bool,
    /// Maximum container nesting depth.
    pub max_depth: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            prefer_strings: true,
            caching: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl WriterOptions {
    /// Creates default options (strings preferred, caching on, depth 128).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_transit::WriterOptions;
    ///
    /// let options = WriterOptions::new();
    /// assert!(options.prefer_strings);
    /// assert!(options.caching);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether integers outside ±2^53 and single-character extension
    /// values are written in their string form.
    #[must_use]
    pub fn with_prefer_strings(mut self, prefer_strings: bool) -> Self {
        self.prefer_strings = prefer_strings;
        self
    }

    /// Enables or disables the rolling write cache.
    #[must_use]
    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

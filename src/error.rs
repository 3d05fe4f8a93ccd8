//! Error types for Transit serialization.
//!
//! Every failure aborts the write it happened in. There is no partial-output
//! mode: a half-written container cannot be closed without corrupting nesting,
//! so the writer discards its buffer and state before returning the error.
//!
//! ## Error Categories
//!
//! - **Unsupported values**: no handler is registered for a value's type key
//! - **Structural errors**: the emission state machine was driven out of order
//! - **Key errors**: a composite value was placed where a JSON object key is required
//! - **Cache errors**: a cache delegate refused a string
//!
//! ## Examples
//!
//! ```rust
//! use serde_transit::{writer, Error, Format, TransitValue, WriterOptions};
//!
//! let mut w = writer(Format::Json, WriterOptions::default());
//! let result = w.write(&TransitValue::custom("point", TransitValue::from(1)));
//!
//! assert!(matches!(result, Err(Error::UnsupportedValue(_))));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while writing Transit.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error while writing the finished document
    #[error("IO error: {0}")]
    Io(String),

    /// No handler resolves for a value
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// The emission state machine was used in an illegal state
    #[error("Invalid emitter state: {0}")]
    InvalidState(String),

    /// A value cannot be written in a map key position
    #[error("Value tagged `{tag}` cannot be used as a map key")]
    InvalidKey { tag: String },

    /// A handler produced a representation that does not fit its tag
    #[error("Handler for tag `{tag}` produced an invalid representation: expected {expected}")]
    InvalidRepresentation { tag: String, expected: String },

    /// Input nesting exceeded the configured depth limit
    #[error("Nesting depth exceeds the limit of {limit}")]
    NestingTooDeep { limit: usize },

    /// Error reported by a cache delegate
    #[error("Cache error: {0}")]
    Cache(String),

    /// Requested wire format is not available
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an unsupported value error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_transit::Error;
    ///
    /// let err = Error::unsupported_value("no handler for `point`");
    /// assert!(err.to_string().contains("point"));
    /// ```
    pub fn unsupported_value<T: fmt::Display>(msg: T) -> Self {
        Error::UnsupportedValue(msg.to_string())
    }

    /// Creates a structural error for an illegal state-machine transition.
    pub fn invalid_state<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidState(msg.to_string())
    }

    /// Creates an error for a value that cannot be written as a map key.
    pub fn invalid_key(tag: &str) -> Self {
        Error::InvalidKey {
            tag: tag.to_string(),
        }
    }

    /// Creates an error for a handler representation that does not match its tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_transit::Error;
    ///
    /// let err = Error::invalid_representation("i", "an integer");
    /// assert!(err.to_string().contains("expected an integer"));
    /// ```
    pub fn invalid_representation(tag: &str, expected: &str) -> Self {
        Error::InvalidRepresentation {
            tag: tag.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Creates a cache delegate error.
    pub fn cache<T: fmt::Display>(msg: T) -> Self {
        Error::Cache(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

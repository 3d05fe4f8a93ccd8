//! Write-side string caching.
//!
//! The emitter hands every map key and every tagged scalar string to a
//! [`WriteCache`] before quoting it. The cache either returns the string
//! unchanged or a short code standing for an earlier occurrence within the
//! same document. The emitter never looks at what comes back.
//!
//! A cache is scoped to one top-level write: codes only mean something to a
//! reader that saw the earlier occurrence in the same document.
//!
//! ## Examples
//!
//! ```rust
//! use serde_transit::cache::{RollingCache, WriteCache};
//!
//! let mut cache = RollingCache::new();
//! assert_eq!(cache.write("name", true).unwrap(), "name");
//! assert_eq!(cache.write("name", true).unwrap(), "^0");
//! // Short strings are never cached
//! assert_eq!(cache.write("id", true).unwrap(), "id");
//! ```

use crate::escape::{ESC, SUB};
use crate::Result;
use std::borrow::Cow;
use std::collections::HashMap;

/// Strings of this many characters or fewer are never cached.
pub const MIN_SIZE_CACHEABLE: usize = 3;
/// Number of digits in the cache code alphabet.
pub const CACHE_CODE_DIGITS: usize = 44;
/// First character of the cache code alphabet (`'0'`).
pub const BASE_CHAR_IDX: u8 = 48;
/// Number of codes available before the cache starts over.
pub const MAX_CACHE_ENTRIES: usize = CACHE_CODE_DIGITS * CACHE_CODE_DIGITS;

/// A cache delegate consulted for every cacheable string in one document.
pub trait WriteCache {
    /// Returns `candidate` or a previously assigned substitute for it.
    ///
    /// # Errors
    ///
    /// Implementations may refuse a string; the error aborts the write.
    fn write<'a>(&mut self, candidate: &'a str, as_map_key: bool) -> Result<Cow<'a, str>>;
}

/// Returns `true` if the rolling cache would track `s`.
///
/// Keys longer than three characters are cacheable, as are longer values
/// that start with a tag (`~#`), symbol (`~$`) or keyword (`~:`) prefix.
///
/// # Examples
///
/// ```rust
/// use serde_transit::cache::is_cacheable;
///
/// assert!(is_cacheable("name", true));
/// assert!(!is_cacheable("name", false));
/// assert!(is_cacheable("~:keyword", false));
/// assert!(!is_cacheable("~i12345", false));
/// ```
#[must_use]
pub fn is_cacheable(s: &str, as_map_key: bool) -> bool {
    if s.chars().nth(MIN_SIZE_CACHEABLE).is_none() {
        return false;
    }
    if as_map_key {
        return true;
    }
    match s.strip_prefix(ESC) {
        Some(rest) => rest.starts_with(['#', '$', ':']),
        None => false,
    }
}

/// Converts a cache index into its wire code (`^0`, `^1`, ... `^[[`).
///
/// # Examples
///
/// ```rust
/// use serde_transit::cache::index_to_code;
///
/// assert_eq!(index_to_code(0), "^0");
/// assert_eq!(index_to_code(43), "^[");
/// assert_eq!(index_to_code(44), "^10");
/// ```
#[must_use]
pub fn index_to_code(index: usize) -> String {
    let hi = index / CACHE_CODE_DIGITS;
    let lo = index % CACHE_CODE_DIGITS;
    let mut code = String::with_capacity(3);
    code.push_str(SUB);
    if hi > 0 {
        code.push(code_digit(hi));
    }
    code.push(code_digit(lo));
    code
}

#[inline]
fn code_digit(digit: usize) -> char {
    char::from(BASE_CHAR_IDX + digit as u8)
}

/// The default rolling cache.
///
/// Each new cacheable string is written verbatim and assigned the next
/// index. Once every code is in use the cache forgets everything and starts
/// assigning from zero again, which a reader mirrors by counting.
#[derive(Debug, Default)]
pub struct RollingCache {
    codes: HashMap<String, String>,
    next_index: usize,
}

impl RollingCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of strings currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Forgets every assigned code.
    pub fn clear(&mut self) {
        self.codes.clear();
        self.next_index = 0;
    }
}

impl WriteCache for RollingCache {
    fn write<'a>(&mut self, candidate: &'a str, as_map_key: bool) -> Result<Cow<'a, str>> {
        if !is_cacheable(candidate, as_map_key) {
            return Ok(Cow::Borrowed(candidate));
        }
        if let Some(code) = self.codes.get(candidate) {
            tracing::trace!(candidate, code = code.as_str(), "cache hit");
            return Ok(Cow::Owned(code.clone()));
        }
        if self.next_index == MAX_CACHE_ENTRIES {
            tracing::trace!("write cache full, starting over");
            self.clear();
        }
        self.codes
            .insert(candidate.to_string(), index_to_code(self.next_index));
        self.next_index += 1;
        Ok(Cow::Borrowed(candidate))
    }
}

/// A cache that never substitutes anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl WriteCache for NoCache {
    fn write<'a>(&mut self, candidate: &'a str, _as_map_key: bool) -> Result<Cow<'a, str>> {
        Ok(Cow::Borrowed(candidate))
    }
}

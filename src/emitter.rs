//! The emission engine: structural punctuation and scalar literals.
//!
//! A [`Marshaller`] is the only thing that writes output. It exposes one
//! primitive per wire form (`null`, strings, booleans, numbers, binary) plus
//! container start/end calls, and it owns whatever state it needs to place
//! separators correctly.
//!
//! [`JsonMarshaller`] keeps an explicit stack of positions. A container
//! pushes its own marker followed by a "first position" marker, so deciding
//! whether a separator is needed never requires lookahead:
//!
//! ```text
//! [            Array, ArrayFirstValue
//! [1           Array
//! [1,2         Array
//! [1,2,{       Array, Object, ObjectFirstKey
//! [1,2,{"a":   Array, Object, ObjectValue
//! [1,2,{"a":3  Array, Object, ObjectKey
//! ```

use crate::cache::WriteCache;
use crate::escape::ESC;
use crate::{Error, Result};
use base64::{engine::general_purpose, Engine as _};
use num_bigint::BigInt;

/// Integers in `(-2^53, 2^53)` survive a round trip through an IEEE double.
pub const JSON_INT_MAX: i64 = 1 << 53;

/// An integer representation handed to [`Marshaller::emit_integer`].
#[derive(Debug, Clone, Copy)]
pub enum IntRep<'a> {
    Small(i64),
    Big(&'a BigInt),
    /// Decimal digits supplied as a string; always written in string form.
    Text(&'a str),
}

/// An emission engine for one wire format.
///
/// A marshaller may hold per-document state; [`Marshaller::flush`] returns
/// the finished document and readies it for the next one.
pub trait Marshaller {
    /// Whether single-character extension values and out-of-range integers
    /// are written as strings.
    fn prefers_strings(&self) -> bool;

    fn emit_nil(&mut self, as_map_key: bool, cache: &mut dyn WriteCache) -> Result<()>;

    /// Writes `prefix + tag + s` as a string, through the cache.
    fn emit_string(
        &mut self,
        prefix: &str,
        tag: &str,
        s: &str,
        as_map_key: bool,
        cache: &mut dyn WriteCache,
    ) -> Result<()>;

    fn emit_boolean(&mut self, b: bool, as_map_key: bool, cache: &mut dyn WriteCache)
        -> Result<()>;

    fn emit_integer(
        &mut self,
        i: IntRep<'_>,
        as_map_key: bool,
        cache: &mut dyn WriteCache,
    ) -> Result<()>;

    fn emit_double(&mut self, d: f64, as_map_key: bool, cache: &mut dyn WriteCache)
        -> Result<()>;

    fn emit_binary(
        &mut self,
        b: &[u8],
        as_map_key: bool,
        cache: &mut dyn WriteCache,
    ) -> Result<()>;

    fn emit_array_start(&mut self, size: usize) -> Result<()>;

    fn emit_array_end(&mut self) -> Result<()>;

    fn emit_map_start(&mut self, size: usize) -> Result<()>;

    fn emit_map_end(&mut self) -> Result<()>;

    /// Returns the finished document and resets the marshaller.
    ///
    /// # Errors
    ///
    /// Fails if a container is still open; the marshaller is reset anyway.
    fn flush(&mut self) -> Result<String>;

    /// Discards any partial document.
    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Object,
    Array,
    ObjectKey,
    ObjectValue,
    ObjectFirstKey,
    ArrayFirstValue,
}

/// The JSON marshaller.
///
/// # Examples
///
/// ```rust
/// use serde_transit::cache::NoCache;
/// use serde_transit::emitter::{IntRep, JsonMarshaller, Marshaller};
///
/// let mut em = JsonMarshaller::new(true);
/// let mut cache = NoCache;
///
/// em.emit_map_start(1).unwrap();
/// em.emit_string("", "", "a", true, &mut cache).unwrap();
/// em.emit_array_start(2).unwrap();
/// em.emit_integer(IntRep::Small(1), false, &mut cache).unwrap();
/// em.emit_boolean(false, false, &mut cache).unwrap();
/// em.emit_array_end().unwrap();
/// em.emit_map_end().unwrap();
///
/// assert_eq!(em.flush().unwrap(), r#"{"a":[1,false]}"#);
/// ```
#[derive(Debug, Clone)]
pub struct JsonMarshaller {
    state: Vec<State>,
    buffer: String,
    prefer_strings: bool,
}

impl JsonMarshaller {
    pub fn new(prefer_strings: bool) -> Self {
        JsonMarshaller {
            state: Vec::new(),
            buffer: String::with_capacity(256),
            prefer_strings,
        }
    }

    /// Current nesting depth in containers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.state
            .iter()
            .filter(|s| matches!(s, State::Object | State::Array))
            .count()
    }

    fn top(&self) -> Option<State> {
        self.state.last().copied()
    }

    fn replace_top(&mut self, state: State) {
        self.state.pop();
        self.state.push(state);
    }

    // Moves the machine past a value position. Containers are values too.
    fn begin_value(&mut self) -> Result<()> {
        match self.top() {
            Some(State::Array) => self.buffer.push(','),
            Some(State::ArrayFirstValue) => {
                self.state.pop();
            }
            Some(State::ObjectValue) => self.replace_top(State::ObjectKey),
            Some(state @ (State::ObjectKey | State::ObjectFirstKey)) => {
                return Err(Error::invalid_state(format!(
                    "cannot write a value in state {state:?}, a key is expected"
                )));
            }
            Some(state @ State::Object) => {
                return Err(Error::invalid_state(format!(
                    "cannot write a value in state {state:?}"
                )));
            }
            None => {}
        }
        Ok(())
    }

    fn push_container(&mut self, container: State) -> Result<()> {
        self.begin_value()?;
        let (first, open) = match container {
            State::Array => (State::ArrayFirstValue, '['),
            State::Object => (State::ObjectFirstKey, '{'),
            other => {
                return Err(Error::invalid_state(format!(
                    "cannot push non-container state {other:?}"
                )))
            }
        };
        self.state.push(container);
        self.state.push(first);
        self.buffer.push(open);
        Ok(())
    }

    fn pop_container(&mut self) -> Result<State> {
        while let Some(state) = self.state.pop() {
            match state {
                State::Array => {
                    self.buffer.push(']');
                    return Ok(State::Array);
                }
                State::Object => {
                    self.buffer.push('}');
                    return Ok(State::Object);
                }
                _ => {}
            }
        }
        Err(Error::invalid_state("no open container to close"))
    }

    fn write_key(&mut self, token: &str) -> Result<()> {
        match self.top() {
            Some(State::ObjectKey) => self.buffer.push(','),
            Some(State::ObjectFirstKey) => {}
            state => {
                return Err(Error::invalid_state(format!(
                    "cannot write a key in state {state:?}"
                )))
            }
        }
        self.replace_top(State::ObjectValue);
        self.buffer.push_str(token);
        self.buffer.push(':');
        Ok(())
    }

    fn write_value(&mut self, token: &str) -> Result<()> {
        self.begin_value()?;
        self.buffer.push_str(token);
        Ok(())
    }

    fn write_object(&mut self, token: &str, as_map_key: bool) -> Result<()> {
        if as_map_key {
            self.write_key(token)
        } else {
            self.write_value(token)
        }
    }
}

impl Default for JsonMarshaller {
    fn default() -> Self {
        JsonMarshaller::new(true)
    }
}

impl Marshaller for JsonMarshaller {
    fn prefers_strings(&self) -> bool {
        self.prefer_strings
    }

    fn emit_nil(&mut self, as_map_key: bool, cache: &mut dyn WriteCache) -> Result<()> {
        if as_map_key {
            self.emit_string(ESC, "_", "", as_map_key, cache)
        } else {
            self.write_value("null")
        }
    }

    fn emit_string(
        &mut self,
        prefix: &str,
        tag: &str,
        s: &str,
        as_map_key: bool,
        cache: &mut dyn WriteCache,
    ) -> Result<()> {
        let mut candidate = String::with_capacity(prefix.len() + tag.len() + s.len());
        candidate.push_str(prefix);
        candidate.push_str(tag);
        candidate.push_str(s);
        let written = cache.write(&candidate, as_map_key)?;
        let quoted = quote_json(&written);
        self.write_object(&quoted, as_map_key)
    }

    fn emit_boolean(
        &mut self,
        b: bool,
        as_map_key: bool,
        cache: &mut dyn WriteCache,
    ) -> Result<()> {
        if as_map_key {
            self.emit_string(ESC, "?", if b { "t" } else { "f" }, as_map_key, cache)
        } else {
            self.write_value(if b { "true" } else { "false" })
        }
    }

    fn emit_integer(
        &mut self,
        i: IntRep<'_>,
        as_map_key: bool,
        cache: &mut dyn WriteCache,
    ) -> Result<()> {
        match i {
            IntRep::Small(n) => {
                let out_of_range = n >= JSON_INT_MAX || n <= -JSON_INT_MAX;
                if as_map_key || (self.prefer_strings && out_of_range) {
                    self.emit_string(ESC, "i", &n.to_string(), as_map_key, cache)
                } else {
                    self.write_value(&n.to_string())
                }
            }
            IntRep::Big(b) => match i64::try_from(b) {
                Ok(n) => self.emit_integer(IntRep::Small(n), as_map_key, cache),
                Err(_) => self.emit_string(ESC, "i", &b.to_string(), as_map_key, cache),
            },
            IntRep::Text(s) => self.emit_string(ESC, "i", s, as_map_key, cache),
        }
    }

    fn emit_double(
        &mut self,
        d: f64,
        as_map_key: bool,
        cache: &mut dyn WriteCache,
    ) -> Result<()> {
        if !d.is_finite() {
            let special = if d.is_nan() {
                "NaN"
            } else if d > 0.0 {
                "INF"
            } else {
                "-INF"
            };
            return self.emit_string(ESC, "z", special, as_map_key, cache);
        }
        let mut buf = ryu::Buffer::new();
        let literal = buf.format_finite(d);
        if as_map_key {
            self.emit_string(ESC, "d", literal, as_map_key, cache)
        } else {
            self.write_value(literal)
        }
    }

    fn emit_binary(
        &mut self,
        b: &[u8],
        as_map_key: bool,
        cache: &mut dyn WriteCache,
    ) -> Result<()> {
        let encoded = general_purpose::STANDARD.encode(b);
        self.emit_string(ESC, "b", &encoded, as_map_key, cache)
    }

    fn emit_array_start(&mut self, _size: usize) -> Result<()> {
        self.push_container(State::Array)
    }

    fn emit_array_end(&mut self) -> Result<()> {
        match self.pop_container()? {
            State::Array => Ok(()),
            _ => Err(Error::invalid_state("array end closed an object")),
        }
    }

    fn emit_map_start(&mut self, _size: usize) -> Result<()> {
        self.push_container(State::Object)
    }

    fn emit_map_end(&mut self) -> Result<()> {
        match self.pop_container()? {
            State::Object => Ok(()),
            _ => Err(Error::invalid_state("map end closed an array")),
        }
    }

    fn flush(&mut self) -> Result<String> {
        let open = self.depth();
        let document = std::mem::take(&mut self.buffer);
        self.state.clear();
        if open > 0 {
            return Err(Error::invalid_state(format!(
                "{open} container(s) left open at flush"
            )));
        }
        Ok(document)
    }

    fn reset(&mut self) {
        self.state.clear();
        self.buffer.clear();
    }
}

/// Wraps `s` in double quotes, escaping what JSON requires.
fn quote_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c < '\u{0020}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

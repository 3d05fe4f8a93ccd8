//! Handler registry: how each kind of value is tagged and represented.
//!
//! A [`Handler`] tells the marshaller two things about a value: its **tag**
//! (which wire encoding to use) and its **representation** (the payload to
//! write). Handlers are registered per type key; every [`TransitValue`]
//! reports its key through [`TransitValue::type_key`].
//!
//! ## Built-in Tags
//!
//! | Type key | Tag | Representation |
//! |----------|-----|----------------|
//! | `null` | `_` | itself |
//! | `boolean` | `?` | itself |
//! | `integer`, `bigint` | `i` | itself |
//! | `float` | `d` | itself |
//! | `string` | `s` | itself |
//! | `binary` | `b` | itself |
//! | `date` | `m` | milliseconds since the epoch |
//! | `keyword` | `:` | the name |
//! | `symbol` | `$` | the name |
//! | `array`, `typed_array` | `array` | itself |
//! | `map` | `map` | itself |
//! | `set` | `set` | its elements |
//! | `quote` | `'` | the quoted value |
//! | `tagged`, `as_tag` | their own tag | their own representation |
//!
//! ## Custom Handlers
//!
//! ```rust
//! use serde_transit::handlers::{Handler, Representation};
//! use serde_transit::{writer, Format, Result, TransitValue, WriterOptions};
//! use std::borrow::Cow;
//!
//! struct PointHandler;
//!
//! impl Handler for PointHandler {
//!     fn tag<'a>(&self, _value: &'a TransitValue) -> Result<Cow<'a, str>> {
//!         Ok(Cow::Borrowed("point"))
//!     }
//!
//!     fn rep<'a>(&self, value: &'a TransitValue) -> Result<Representation<'a>> {
//!         match value {
//!             TransitValue::Custom(c) => Ok(Representation::Borrowed(&c.payload)),
//!             other => Err(serde_transit::Error::unsupported_value(other.type_key())),
//!         }
//!     }
//! }
//!
//! let mut w = writer(Format::Json, WriterOptions::default());
//! w.register("point", PointHandler);
//!
//! let p = TransitValue::custom("point", TransitValue::from(vec![TransitValue::from(1), TransitValue::from(2)]));
//! assert_eq!(w.write(&p).unwrap(), r#"{"~#point":[1,2]}"#);
//! ```

use crate::{Error, Result, TransitValue};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type keys of the built-in value kinds.
pub mod type_key {
    pub const NULL: &str = "null";
    pub const BOOLEAN: &str = "boolean";
    pub const INTEGER: &str = "integer";
    pub const BIGINT: &str = "bigint";
    pub const FLOAT: &str = "float";
    pub const STRING: &str = "string";
    pub const BINARY: &str = "binary";
    pub const DATE: &str = "date";
    pub const KEYWORD: &str = "keyword";
    pub const SYMBOL: &str = "symbol";
    pub const ARRAY: &str = "array";
    pub const TYPED_ARRAY: &str = "typed_array";
    pub const MAP: &str = "map";
    pub const SET: &str = "set";
    pub const QUOTE: &str = "quote";
    pub const TAGGED: &str = "tagged";
    pub const AS_TAG: &str = "as_tag";
}

/// Tags with a dedicated emission path in the marshaller.
pub mod tag {
    pub const NULL: &str = "_";
    pub const STRING: &str = "s";
    pub const BOOLEAN: &str = "?";
    pub const INTEGER: &str = "i";
    pub const FLOAT: &str = "d";
    pub const BINARY: &str = "b";
    pub const QUOTE: &str = "'";
    pub const ARRAY: &str = "array";
    pub const MAP: &str = "map";
    pub const DATE: &str = "m";
    pub const KEYWORD: &str = ":";
    pub const SYMBOL: &str = "$";
    pub const SET: &str = "set";
    pub const CMAP: &str = "cmap";
}

/// The payload a handler extracts from a value.
#[derive(Debug, Clone)]
pub enum Representation<'a> {
    /// A value borrowed from the input graph.
    Borrowed(&'a TransitValue),
    /// A value computed by the handler.
    Owned(TransitValue),
    /// An ordered sequence of borrowed values, written as an array.
    Seq(Vec<&'a TransitValue>),
}

impl<'a> Representation<'a> {
    /// Returns the single value of this representation, if it has one.
    #[must_use]
    pub fn as_value(&self) -> Option<&TransitValue> {
        match self {
            Representation::Borrowed(v) => Some(*v),
            Representation::Owned(v) => Some(v),
            Representation::Seq(_) => None,
        }
    }

    /// Returns the representation as a string, if it is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(TransitValue::as_str)
    }
}

/// Decides the tag and representation of the values it is registered for.
///
/// Handlers are shared between writes and must not keep per-write state.
pub trait Handler: Send + Sync {
    /// The dispatch tag for `value`.
    ///
    /// # Errors
    ///
    /// Fails if the handler does not understand `value`.
    fn tag<'a>(&self, value: &'a TransitValue) -> Result<Cow<'a, str>>;

    /// The payload written for `value`.
    ///
    /// # Errors
    ///
    /// Fails if the handler does not understand `value`.
    fn rep<'a>(&self, value: &'a TransitValue) -> Result<Representation<'a>>;

    /// The string form of `value`, used for single-character tags in key
    /// positions or when the writer prefers strings.
    fn string_rep(&self, _value: &TransitValue) -> Option<String> {
        None
    }
}

fn mismatch(handler: &str, value: &TransitValue) -> Error {
    Error::unsupported_value(format!(
        "{handler} handler cannot represent a `{}` value",
        value.type_key()
    ))
}

/// Handler for ground types whose representation is the value itself.
#[derive(Debug, Clone, Copy)]
pub struct GroundHandler {
    tag: &'static str,
}

impl GroundHandler {
    #[must_use]
    pub const fn new(tag: &'static str) -> Self {
        GroundHandler { tag }
    }
}

impl Handler for GroundHandler {
    fn tag<'a>(&self, _value: &'a TransitValue) -> Result<Cow<'a, str>> {
        Ok(Cow::Borrowed(self.tag))
    }

    fn rep<'a>(&self, value: &'a TransitValue) -> Result<Representation<'a>> {
        Ok(Representation::Borrowed(value))
    }

    fn string_rep(&self, value: &TransitValue) -> Option<String> {
        match value {
            TransitValue::Null => Some(String::new()),
            TransitValue::Bool(b) => Some(if *b { "t" } else { "f" }.to_string()),
            TransitValue::Integer(i) => Some(i.to_string()),
            TransitValue::BigInt(b) => Some(b.to_string()),
            TransitValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Dates are written as milliseconds since the Unix epoch under `m`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateHandler;

impl Handler for DateHandler {
    fn tag<'a>(&self, _value: &'a TransitValue) -> Result<Cow<'a, str>> {
        Ok(Cow::Borrowed(tag::DATE))
    }

    fn rep<'a>(&self, value: &'a TransitValue) -> Result<Representation<'a>> {
        match value {
            TransitValue::Date(dt) => Ok(Representation::Owned(TransitValue::Integer(
                dt.timestamp_millis(),
            ))),
            other => Err(mismatch("date", other)),
        }
    }

    fn string_rep(&self, value: &TransitValue) -> Option<String> {
        match value {
            TransitValue::Date(dt) => Some(dt.timestamp_millis().to_string()),
            _ => None,
        }
    }
}

/// Keywords (`:`) and symbols (`$`): their names are the representation.
#[derive(Debug, Clone, Copy)]
pub struct NameHandler {
    tag: &'static str,
}

impl NameHandler {
    #[must_use]
    pub const fn keyword() -> Self {
        NameHandler { tag: tag::KEYWORD }
    }

    #[must_use]
    pub const fn symbol() -> Self {
        NameHandler { tag: tag::SYMBOL }
    }
}

impl Handler for NameHandler {
    fn tag<'a>(&self, _value: &'a TransitValue) -> Result<Cow<'a, str>> {
        Ok(Cow::Borrowed(self.tag))
    }

    fn rep<'a>(&self, value: &'a TransitValue) -> Result<Representation<'a>> {
        match value {
            TransitValue::Keyword(name) | TransitValue::Symbol(name) => {
                Ok(Representation::Owned(TransitValue::String(name.clone())))
            }
            other => Err(mismatch("name", other)),
        }
    }

    fn string_rep(&self, value: &TransitValue) -> Option<String> {
        match value {
            TransitValue::Keyword(name) | TransitValue::Symbol(name) => Some(name.clone()),
            _ => None,
        }
    }
}

/// Sets are written as `{"~#set": [elements...]}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetHandler;

impl Handler for SetHandler {
    fn tag<'a>(&self, _value: &'a TransitValue) -> Result<Cow<'a, str>> {
        Ok(Cow::Borrowed(tag::SET))
    }

    fn rep<'a>(&self, value: &'a TransitValue) -> Result<Representation<'a>> {
        match value {
            TransitValue::Set(set) => Ok(Representation::Seq(set.iter().collect())),
            other => Err(mismatch("set", other)),
        }
    }
}

/// Quoted values carry the quote tag and expose the wrapped value.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteHandler;

impl Handler for QuoteHandler {
    fn tag<'a>(&self, _value: &'a TransitValue) -> Result<Cow<'a, str>> {
        Ok(Cow::Borrowed(tag::QUOTE))
    }

    fn rep<'a>(&self, value: &'a TransitValue) -> Result<Representation<'a>> {
        match value {
            TransitValue::Quote(inner) => Ok(Representation::Borrowed(inner)),
            other => Err(mismatch("quote", other)),
        }
    }
}

/// Tagged values and as-tag values supply their own tag and representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfTaggedHandler;

impl Handler for SelfTaggedHandler {
    fn tag<'a>(&self, value: &'a TransitValue) -> Result<Cow<'a, str>> {
        match value {
            TransitValue::Tagged(t) => Ok(Cow::Borrowed(&t.tag)),
            TransitValue::AsTag(t) => Ok(Cow::Borrowed(&t.tag)),
            other => Err(mismatch("tagged", other)),
        }
    }

    fn rep<'a>(&self, value: &'a TransitValue) -> Result<Representation<'a>> {
        match value {
            TransitValue::Tagged(t) => Ok(Representation::Borrowed(&t.rep)),
            TransitValue::AsTag(t) => Ok(Representation::Borrowed(&t.rep)),
            other => Err(mismatch("tagged", other)),
        }
    }

    fn string_rep(&self, value: &TransitValue) -> Option<String> {
        match value {
            TransitValue::AsTag(t) => t.string_rep.clone(),
            TransitValue::Tagged(t) => t.rep.as_str().map(str::to_string),
            _ => None,
        }
    }
}

/// A registry of handlers keyed by type key.
///
/// Cloning is cheap: handlers are shared behind `Arc`.
#[derive(Clone)]
pub struct Handlers {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl Handlers {
    /// Creates a registry with the built-in handlers installed.
    #[must_use]
    pub fn new() -> Self {
        let mut handlers = Handlers::empty();
        handlers.register(type_key::NULL, GroundHandler::new(tag::NULL));
        handlers.register(type_key::BOOLEAN, GroundHandler::new(tag::BOOLEAN));
        handlers.register(type_key::INTEGER, GroundHandler::new(tag::INTEGER));
        handlers.register(type_key::BIGINT, GroundHandler::new(tag::INTEGER));
        handlers.register(type_key::FLOAT, GroundHandler::new(tag::FLOAT));
        handlers.register(type_key::STRING, GroundHandler::new(tag::STRING));
        handlers.register(type_key::BINARY, GroundHandler::new(tag::BINARY));
        handlers.register(type_key::ARRAY, GroundHandler::new(tag::ARRAY));
        handlers.register(type_key::TYPED_ARRAY, GroundHandler::new(tag::ARRAY));
        handlers.register(type_key::MAP, GroundHandler::new(tag::MAP));
        handlers.register(type_key::DATE, DateHandler);
        handlers.register(type_key::KEYWORD, NameHandler::keyword());
        handlers.register(type_key::SYMBOL, NameHandler::symbol());
        handlers.register(type_key::SET, SetHandler);
        handlers.register(type_key::QUOTE, QuoteHandler);
        handlers.register(type_key::TAGGED, SelfTaggedHandler);
        handlers.register(type_key::AS_TAG, SelfTaggedHandler);
        handlers
    }

    /// Creates a registry with no handlers at all.
    #[must_use]
    pub fn empty() -> Self {
        Handlers {
            handlers: HashMap::new(),
        }
    }

    /// Installs `handler` for `type_key`, returning the handler it replaces.
    pub fn register<H>(&mut self, type_key: impl Into<String>, handler: H) -> Option<Arc<dyn Handler>>
    where
        H: Handler + 'static,
    {
        self.handlers.insert(type_key.into(), Arc::new(handler))
    }

    /// Looks up the handler for `value`.
    #[must_use]
    pub fn get(&self, value: &TransitValue) -> Option<&dyn Handler> {
        self.handlers.get(value.type_key()).map(|h| h.as_ref())
    }

    /// Returns `true` if a handler is installed for `type_key`.
    #[must_use]
    pub fn contains(&self, type_key: &str) -> bool {
        self.handlers.contains_key(type_key)
    }
}

impl Default for Handlers {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.handlers.keys().collect();
        keys.sort();
        f.debug_struct("Handlers").field("type_keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TransitSet, TypedArray};
    use chrono::{TimeZone, Utc};

    fn tag_of(handlers: &Handlers, value: &TransitValue) -> String {
        handlers.get(value).unwrap().tag(value).unwrap().into_owned()
    }

    #[test]
    fn test_builtin_tags() {
        let handlers = Handlers::new();
        assert_eq!(tag_of(&handlers, &TransitValue::Null), "_");
        assert_eq!(tag_of(&handlers, &TransitValue::from(true)), "?");
        assert_eq!(tag_of(&handlers, &TransitValue::from(1)), "i");
        assert_eq!(tag_of(&handlers, &TransitValue::from(1.5)), "d");
        assert_eq!(tag_of(&handlers, &TransitValue::from("s")), "s");
        assert_eq!(tag_of(&handlers, &TransitValue::Binary(vec![1])), "b");
        assert_eq!(tag_of(&handlers, &TransitValue::keyword("k")), ":");
        assert_eq!(
            tag_of(&handlers, &TransitValue::TypedArray(TypedArray::I8(vec![]))),
            "array"
        );
        assert_eq!(
            tag_of(&handlers, &TransitValue::tagged("point", TransitValue::Null)),
            "point"
        );
    }

    #[test]
    fn test_date_representation() {
        let dt = Utc.timestamp_millis_opt(1_500).unwrap();
        let value = TransitValue::Date(dt);
        let handler = DateHandler;

        let rep = handler.rep(&value).unwrap();
        assert_eq!(rep.as_value(), Some(&TransitValue::Integer(1_500)));
        assert_eq!(handler.string_rep(&value).as_deref(), Some("1500"));
    }

    #[test]
    fn test_set_representation_is_sequence() {
        let mut set = TransitSet::new();
        set.insert(TransitValue::from(1));
        set.insert(TransitValue::from(2));
        let value = TransitValue::Set(set);

        match SetHandler.rep(&value).unwrap() {
            Representation::Seq(items) => assert_eq!(items.len(), 2),
            other => panic!("Expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_handler_mismatch_is_error() {
        assert!(DateHandler.rep(&TransitValue::from(1)).is_err());
        assert!(QuoteHandler.rep(&TransitValue::Null).is_err());
    }

    #[test]
    fn test_register_overrides() {
        let mut handlers = Handlers::new();
        assert!(!handlers.contains("point"));
        assert!(handlers.register("point", SetHandler).is_none());
        assert!(handlers.register("point", QuoteHandler).is_some());
        assert!(handlers.contains("point"));
        assert!(Handlers::empty().get(&TransitValue::Null).is_none());
    }
}

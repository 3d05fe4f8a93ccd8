//! Dynamic value representation for Transit data.
//!
//! [`TransitValue`] is the value graph a writer walks. Besides the JSON
//! types it carries the values plain JSON loses: big integers, binary data,
//! dates, keywords, symbols, sets, typed numeric arrays, maps with composite
//! keys, and user-defined extension values.
//!
//! ## Creating Values
//!
//! ```rust
//! use serde_transit::{transit, TransitValue};
//!
//! let null = TransitValue::Null;
//! let number = TransitValue::from(42);
//! let text = TransitValue::from("hello");
//! let kw = TransitValue::keyword("status");
//!
//! let obj = transit!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(obj.is_map());
//! ```
//!
//! ## Extension Values
//!
//! ```rust
//! use serde_transit::{TransitValue, Writer};
//!
//! let point = TransitValue::tagged("point", TransitValue::from(vec![
//!     TransitValue::from(1),
//!     TransitValue::from(2),
//! ]));
//! assert_eq!(Writer::default().write(&point).unwrap(), r#"{"~#point":[1,2]}"#);
//! ```
//!
//! ## Equality and Hashing
//!
//! Values are used as map keys, so they implement `Eq` and `Hash`. Floats
//! compare by bit pattern (`NaN == NaN`, `0.0 != -0.0`). Maps and sets
//! compare regardless of insertion order and hash only their length.

use crate::handlers::type_key;
use crate::{TransitMap, TransitSet};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use std::hash::{Hash, Hasher};

/// A dynamically-typed representation of any value a Transit writer accepts.
#[derive(Clone, Debug, Default)]
pub enum TransitValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    BigInt(BigInt),
    Float(f64),
    String(String),
    Binary(Vec<u8>),
    Date(DateTime<Utc>),
    Keyword(String),
    Symbol(String),
    Array(Vec<TransitValue>),
    TypedArray(TypedArray),
    Map(TransitMap),
    Set(TransitSet),
    Quote(Box<TransitValue>),
    Tagged(TaggedValue),
    AsTag(AsTag),
    Custom(Custom),
}

/// A fixed-width numeric buffer.
///
/// Written exactly like an array of numbers; the element width is known up
/// front so no per-element inspection happens.
#[derive(Clone, Debug)]
pub enum TypedArray {
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl TypedArray {
    /// Number of elements in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            TypedArray::I8(v) => v.len(),
            TypedArray::I16(v) => v.len(),
            TypedArray::I32(v) => v.len(),
            TypedArray::I64(v) => v.len(),
            TypedArray::F32(v) => v.len(),
            TypedArray::F64(v) => v.len(),
        }
    }

    /// Returns `true` if the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the element type (`"i8"`, `"f64"`, ...).
    #[must_use]
    pub const fn element_type(&self) -> &'static str {
        match self {
            TypedArray::I8(_) => "i8",
            TypedArray::I16(_) => "i16",
            TypedArray::I32(_) => "i32",
            TypedArray::I64(_) => "i64",
            TypedArray::F32(_) => "f32",
            TypedArray::F64(_) => "f64",
        }
    }
}

impl PartialEq for TypedArray {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypedArray::I8(a), TypedArray::I8(b)) => a == b,
            (TypedArray::I16(a), TypedArray::I16(b)) => a == b,
            (TypedArray::I32(a), TypedArray::I32(b)) => a == b,
            (TypedArray::I64(a), TypedArray::I64(b)) => a == b,
            (TypedArray::F32(a), TypedArray::F32(b)) => {
                a.iter().map(|f| f.to_bits()).eq(b.iter().map(|f| f.to_bits()))
            }
            (TypedArray::F64(a), TypedArray::F64(b)) => {
                a.iter().map(|f| f.to_bits()).eq(b.iter().map(|f| f.to_bits()))
            }
            _ => false,
        }
    }
}

impl Eq for TypedArray {}

impl Hash for TypedArray {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            TypedArray::I8(v) => v.hash(state),
            TypedArray::I16(v) => v.hash(state),
            TypedArray::I32(v) => v.hash(state),
            TypedArray::I64(v) => v.hash(state),
            TypedArray::F32(v) => v.iter().for_each(|f| f.to_bits().hash(state)),
            TypedArray::F64(v) => v.iter().for_each(|f| f.to_bits().hash(state)),
        }
    }
}

/// A generic extension value: an arbitrary tag and its representation.
///
/// A multi-character tag is written as `{"~#tag": rep}`. A one-character tag
/// with a string representation is written as `"~" + tag + rep`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaggedValue {
    pub tag: String,
    pub rep: Box<TransitValue>,
}

/// A value that declares its own tag, representation and string form,
/// bypassing handler lookup for its contents.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AsTag {
    pub tag: String,
    pub rep: Box<TransitValue>,
    pub string_rep: Option<String>,
}

/// A user-defined value. Writing it requires a handler registered under
/// `type_key`; the handler decides the tag and representation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Custom {
    pub type_key: String,
    pub payload: Box<TransitValue>,
}

impl TransitValue {
    /// Wraps a value so that it is written under the quote tag.
    #[must_use]
    pub fn quote(value: TransitValue) -> Self {
        TransitValue::Quote(Box::new(value))
    }

    /// Creates a generic extension value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_transit::TransitValue;
    ///
    /// let v = TransitValue::tagged("point", TransitValue::from(1));
    /// assert!(matches!(v, TransitValue::Tagged(ref t) if t.tag == "point"));
    /// ```
    #[must_use]
    pub fn tagged(tag: impl Into<String>, rep: TransitValue) -> Self {
        TransitValue::Tagged(TaggedValue {
            tag: tag.into(),
            rep: Box::new(rep),
        })
    }

    /// Creates a value with an explicit tag, representation and string form.
    #[must_use]
    pub fn as_tag(tag: impl Into<String>, rep: TransitValue, string_rep: Option<String>) -> Self {
        TransitValue::AsTag(AsTag {
            tag: tag.into(),
            rep: Box::new(rep),
            string_rep,
        })
    }

    /// Creates a user-defined value resolved through the handler registry.
    #[must_use]
    pub fn custom(type_key: impl Into<String>, payload: TransitValue) -> Self {
        TransitValue::Custom(Custom {
            type_key: type_key.into(),
            payload: Box::new(payload),
        })
    }

    /// Creates a keyword (`~:name`).
    #[must_use]
    pub fn keyword(name: impl Into<String>) -> Self {
        TransitValue::Keyword(name.into())
    }

    /// Creates a symbol (`~$name`).
    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        TransitValue::Symbol(name.into())
    }

    /// Returns the key under which this value's handler is registered.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_transit::TransitValue;
    ///
    /// assert_eq!(TransitValue::from(1).type_key(), "integer");
    /// assert_eq!(TransitValue::custom("point", TransitValue::Null).type_key(), "point");
    /// ```
    #[must_use]
    pub fn type_key(&self) -> &str {
        match self {
            TransitValue::Null => type_key::NULL,
            TransitValue::Bool(_) => type_key::BOOLEAN,
            TransitValue::Integer(_) => type_key::INTEGER,
            TransitValue::BigInt(_) => type_key::BIGINT,
            TransitValue::Float(_) => type_key::FLOAT,
            TransitValue::String(_) => type_key::STRING,
            TransitValue::Binary(_) => type_key::BINARY,
            TransitValue::Date(_) => type_key::DATE,
            TransitValue::Keyword(_) => type_key::KEYWORD,
            TransitValue::Symbol(_) => type_key::SYMBOL,
            TransitValue::Array(_) => type_key::ARRAY,
            TransitValue::TypedArray(_) => type_key::TYPED_ARRAY,
            TransitValue::Map(_) => type_key::MAP,
            TransitValue::Set(_) => type_key::SET,
            TransitValue::Quote(_) => type_key::QUOTE,
            TransitValue::Tagged(_) => type_key::TAGGED,
            TransitValue::AsTag(_) => type_key::AS_TAG,
            TransitValue::Custom(c) => &c.type_key,
        }
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, TransitValue::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, TransitValue::Bool(_))
    }

    /// Returns `true` if the value is an integer of any size.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, TransitValue::Integer(_) | TransitValue::BigInt(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, TransitValue::String(_))
    }

    /// Returns `true` if the value is an array or typed array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, TransitValue::Array(_) | TransitValue::TypedArray(_))
    }

    /// Returns `true` if the value is a map.
    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, TransitValue::Map(_))
    }

    /// If the value is a boolean, returns it.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TransitValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_transit::TransitValue;
    ///
    /// assert_eq!(TransitValue::from("hello").as_str(), Some("hello"));
    /// assert_eq!(TransitValue::keyword("hello").as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TransitValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer that fits in `i64`, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TransitValue::Integer(i) => Some(*i),
            TransitValue::BigInt(b) => i64::try_from(b).ok(),
            _ => None,
        }
    }

    /// If the value is a float, returns it.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TransitValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<TransitValue>> {
        match self {
            TransitValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is a map, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&TransitMap> {
        match self {
            TransitValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl PartialEq for TransitValue {
    fn eq(&self, other: &Self) -> bool {
        use TransitValue as V;
        match (self, other) {
            (V::Null, V::Null) => true,
            (V::Bool(a), V::Bool(b)) => a == b,
            (V::Integer(a), V::Integer(b)) => a == b,
            (V::BigInt(a), V::BigInt(b)) => a == b,
            (V::Integer(a), V::BigInt(b)) | (V::BigInt(b), V::Integer(a)) => {
                i64::try_from(b).map_or(false, |b| b == *a)
            }
            (V::Float(a), V::Float(b)) => a.to_bits() == b.to_bits(),
            (V::String(a), V::String(b)) => a == b,
            (V::Binary(a), V::Binary(b)) => a == b,
            (V::Date(a), V::Date(b)) => a == b,
            (V::Keyword(a), V::Keyword(b)) => a == b,
            (V::Symbol(a), V::Symbol(b)) => a == b,
            (V::Array(a), V::Array(b)) => a == b,
            (V::TypedArray(a), V::TypedArray(b)) => a == b,
            (V::Map(a), V::Map(b)) => a == b,
            (V::Set(a), V::Set(b)) => a == b,
            (V::Quote(a), V::Quote(b)) => a == b,
            (V::Tagged(a), V::Tagged(b)) => a == b,
            (V::AsTag(a), V::AsTag(b)) => a == b,
            (V::Custom(a), V::Custom(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TransitValue {}

impl Hash for TransitValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Both integer variants write the same `~i` form, so they share a hash.
        if let Some(i) = self.as_i64() {
            std::mem::discriminant(&TransitValue::Integer(0)).hash(state);
            return i.hash(state);
        }
        std::mem::discriminant(self).hash(state);
        match self {
            TransitValue::Null => {}
            TransitValue::Bool(b) => b.hash(state),
            TransitValue::Integer(i) => i.hash(state),
            TransitValue::BigInt(b) => b.hash(state),
            TransitValue::Float(f) => f.to_bits().hash(state),
            TransitValue::String(s) | TransitValue::Keyword(s) | TransitValue::Symbol(s) => {
                s.hash(state)
            }
            TransitValue::Binary(b) => b.hash(state),
            TransitValue::Date(d) => d.hash(state),
            TransitValue::Array(a) => a.hash(state),
            TransitValue::TypedArray(t) => t.hash(state),
            // Equality ignores order, so only the size is hashed.
            TransitValue::Map(m) => m.len().hash(state),
            TransitValue::Set(s) => s.len().hash(state),
            TransitValue::Quote(q) => q.hash(state),
            TransitValue::Tagged(t) => t.hash(state),
            TransitValue::AsTag(t) => t.hash(state),
            TransitValue::Custom(c) => c.hash(state),
        }
    }
}

/// Maps a value onto the plain serde data model.
///
/// This is lossy by nature: extension values collapse to their payloads,
/// big integers and dates become strings. It exists so values can be handed
/// to other serde formats; the Transit writer walks values directly.
impl Serialize for TransitValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            TransitValue::Null => serializer.serialize_unit(),
            TransitValue::Bool(b) => serializer.serialize_bool(*b),
            TransitValue::Integer(i) => serializer.serialize_i64(*i),
            TransitValue::BigInt(b) => serializer.serialize_str(&b.to_string()),
            TransitValue::Float(f) => serializer.serialize_f64(*f),
            TransitValue::String(s) | TransitValue::Keyword(s) | TransitValue::Symbol(s) => {
                serializer.serialize_str(s)
            }
            TransitValue::Binary(b) => serializer.serialize_bytes(b),
            TransitValue::Date(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            TransitValue::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            TransitValue::TypedArray(typed) => match typed {
                TypedArray::I8(v) => v.serialize(serializer),
                TypedArray::I16(v) => v.serialize(serializer),
                TypedArray::I32(v) => v.serialize(serializer),
                TypedArray::I64(v) => v.serialize(serializer),
                TypedArray::F32(v) => v.serialize(serializer),
                TypedArray::F64(v) => v.serialize(serializer),
            },
            TransitValue::Map(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
            TransitValue::Set(set) => {
                let mut seq = serializer.serialize_seq(Some(set.len()))?;
                for element in set {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            TransitValue::Quote(inner) => inner.serialize(serializer),
            TransitValue::Tagged(t) => {
                let mut m = serializer.serialize_map(Some(1))?;
                m.serialize_entry(&t.tag, &t.rep)?;
                m.end()
            }
            TransitValue::AsTag(t) => t.rep.serialize(serializer),
            TransitValue::Custom(c) => c.payload.serialize(serializer),
        }
    }
}

impl From<bool> for TransitValue {
    fn from(value: bool) -> Self {
        TransitValue::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TransitValue {
                fn from(value: $ty) -> Self {
                    TransitValue::Integer(value as i64)
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for TransitValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => TransitValue::Integer(i),
            Err(_) => TransitValue::BigInt(BigInt::from(value)),
        }
    }
}

impl From<BigInt> for TransitValue {
    fn from(value: BigInt) -> Self {
        TransitValue::BigInt(value)
    }
}

impl From<f32> for TransitValue {
    fn from(value: f32) -> Self {
        TransitValue::Float(value as f64)
    }
}

impl From<f64> for TransitValue {
    fn from(value: f64) -> Self {
        TransitValue::Float(value)
    }
}

impl From<String> for TransitValue {
    fn from(value: String) -> Self {
        TransitValue::String(value)
    }
}

impl From<&str> for TransitValue {
    fn from(value: &str) -> Self {
        TransitValue::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for TransitValue {
    fn from(value: DateTime<Utc>) -> Self {
        TransitValue::Date(value)
    }
}

impl From<Vec<TransitValue>> for TransitValue {
    fn from(value: Vec<TransitValue>) -> Self {
        TransitValue::Array(value)
    }
}

impl From<TypedArray> for TransitValue {
    fn from(value: TypedArray) -> Self {
        TransitValue::TypedArray(value)
    }
}

impl From<TransitMap> for TransitValue {
    fn from(value: TransitMap) -> Self {
        TransitValue::Map(value)
    }
}

impl From<TransitSet> for TransitValue {
    fn from(value: TransitSet) -> Self {
        TransitValue::Set(value)
    }
}

impl<T: Into<TransitValue>> From<Option<T>> for TransitValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(TransitValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &TransitValue) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(TransitValue::from(true), TransitValue::Bool(true));
        assert_eq!(TransitValue::from(42i32), TransitValue::Integer(42));
        assert_eq!(TransitValue::from(3.5f64), TransitValue::Float(3.5));
        assert_eq!(
            TransitValue::from("test"),
            TransitValue::String("test".to_string())
        );
        assert_eq!(TransitValue::from(None::<i32>), TransitValue::Null);
        assert_eq!(TransitValue::from(Some(7u8)), TransitValue::Integer(7));
    }

    #[test]
    fn test_u64_overflow_becomes_bigint() {
        assert_eq!(TransitValue::from(5u64), TransitValue::Integer(5));
        let big = TransitValue::from(u64::MAX);
        assert_eq!(big, TransitValue::BigInt(BigInt::from(u64::MAX)));
        assert_eq!(big.as_i64(), None);
    }

    #[test]
    fn test_float_equality_by_bits() {
        assert_eq!(TransitValue::Float(f64::NAN), TransitValue::Float(f64::NAN));
        assert_ne!(TransitValue::Float(0.0), TransitValue::Float(-0.0));
        assert_eq!(
            hash_of(&TransitValue::Float(f64::NAN)),
            hash_of(&TransitValue::Float(f64::NAN))
        );
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let mut a = TransitMap::new();
        a.insert("x", 1);
        a.insert("y", 2);
        let mut b = TransitMap::new();
        b.insert("y", 2);
        b.insert("x", 1);

        let (a, b) = (TransitValue::Map(a), TransitValue::Map(b));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_integer_variants_compare_by_value() {
        let small = TransitValue::Integer(1);
        let big = TransitValue::BigInt(BigInt::from(1));
        assert_eq!(small, big);
        assert_eq!(big, small);
        assert_eq!(hash_of(&small), hash_of(&big));

        let wide = TransitValue::BigInt(BigInt::from(u64::MAX));
        assert_ne!(wide, TransitValue::Integer(-1));
        assert_ne!(TransitValue::Integer(1), TransitValue::from(1.0));
    }

    #[test]
    fn test_variants_are_distinct() {
        assert_ne!(TransitValue::from("a"), TransitValue::keyword("a"));
        assert_ne!(TransitValue::keyword("a"), TransitValue::symbol("a"));
        assert_ne!(
            TransitValue::TypedArray(TypedArray::I8(vec![1])),
            TransitValue::TypedArray(TypedArray::I16(vec![1]))
        );
    }

    #[test]
    fn test_type_keys() {
        assert_eq!(TransitValue::Null.type_key(), "null");
        assert_eq!(TransitValue::from(Vec::<TransitValue>::new()).type_key(), "array");
        assert_eq!(
            TransitValue::TypedArray(TypedArray::F32(vec![])).type_key(),
            "typed_array"
        );
        assert_eq!(TransitValue::tagged("x", TransitValue::Null).type_key(), "tagged");
    }

    #[test]
    fn test_typed_array_accessors() {
        let t = TypedArray::F64(vec![1.0, 2.0]);
        assert_eq!(t.len(), 2);
        assert!(!t.is_empty());
        assert_eq!(t.element_type(), "f64");
    }
}

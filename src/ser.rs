//! Serde bridge: converting any `Serialize` type into a [`TransitValue`].
//!
//! The conversion follows the serde data model closely:
//!
//! - integers keep their exact value; anything outside `i64` becomes a big integer
//! - byte slices become binary data
//! - structs and maps become maps, with keys of any type
//! - enum variants carrying data become single-entry maps keyed by the variant name
//!
//! Extension types such as keywords or dates have no serde counterpart; build
//! those as [`TransitValue`]s directly and embed them.

use crate::{Error, Result, TransitMap, TransitValue};
use num_bigint::BigInt;
use serde::ser::{self, Serialize};

/// A serializer whose output is a [`TransitValue`].
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_transit::{to_value, TransitValue};
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_map());
/// ```
pub struct TransitValueSerializer;

pub struct SerializeVec {
    vec: Vec<TransitValue>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: TransitMap,
    current_key: Option<TransitValue>,
    variant: Option<&'static str>,
}

/// Converts `value` into a [`TransitValue`].
///
/// # Errors
///
/// Fails when the `Serialize` implementation reports an error.
pub fn to_value<T>(value: &T) -> Result<TransitValue>
where
    T: ?Sized + Serialize,
{
    value.serialize(TransitValueSerializer)
}

fn wrap_variant(variant: Option<&'static str>, value: TransitValue) -> TransitValue {
    match variant {
        Some(name) => {
            let mut map = TransitMap::with_capacity(1);
            map.insert(name, value);
            TransitValue::Map(map)
        }
        None => value,
    }
}

impl ser::Serializer for TransitValueSerializer {
    type Ok = TransitValue;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<TransitValue> {
        Ok(TransitValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<TransitValue> {
        Ok(TransitValue::Integer(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<TransitValue> {
        Ok(TransitValue::Integer(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<TransitValue> {
        Ok(TransitValue::Integer(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<TransitValue> {
        Ok(TransitValue::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<TransitValue> {
        Ok(match i64::try_from(v) {
            Ok(i) => TransitValue::Integer(i),
            Err(_) => TransitValue::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_u8(self, v: u8) -> Result<TransitValue> {
        Ok(TransitValue::Integer(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<TransitValue> {
        Ok(TransitValue::Integer(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<TransitValue> {
        Ok(TransitValue::Integer(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<TransitValue> {
        Ok(TransitValue::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<TransitValue> {
        Ok(match i64::try_from(v) {
            Ok(i) => TransitValue::Integer(i),
            Err(_) => TransitValue::BigInt(BigInt::from(v)),
        })
    }

    fn serialize_f32(self, v: f32) -> Result<TransitValue> {
        Ok(TransitValue::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<TransitValue> {
        Ok(TransitValue::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<TransitValue> {
        Ok(TransitValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<TransitValue> {
        Ok(TransitValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<TransitValue> {
        Ok(TransitValue::Binary(v.to_vec()))
    }

    fn serialize_none(self) -> Result<TransitValue> {
        Ok(TransitValue::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<TransitValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<TransitValue> {
        Ok(TransitValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<TransitValue> {
        Ok(TransitValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<TransitValue> {
        Ok(TransitValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<TransitValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<TransitValue>
    where
        T: ?Sized + Serialize,
    {
        Ok(wrap_variant(Some(variant), to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

impl SerializeVec {
    fn new(len: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(len),
            variant,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> TransitValue {
        wrap_variant(self.variant, TransitValue::Array(self.vec))
    }
}

impl SerializeMap {
    fn new(len: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: TransitMap::with_capacity(len),
            current_key: None,
            variant,
        }
    }

    fn field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn finish(self) -> TransitValue {
        wrap_variant(self.variant, TransitValue::Map(self.map))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = TransitValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<TransitValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = TransitValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<TransitValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = TransitValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<TransitValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = TransitValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<TransitValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = TransitValue;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(to_value(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<TransitValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = TransitValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<TransitValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = TransitValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<TransitValue> {
        Ok(self.finish())
    }
}

//! Tag dispatch: choosing a wire form for every value.
//!
//! For each value the dispatcher resolves a handler, asks it for a tag and a
//! representation, and routes to the matching [`Marshaller`] primitive.
//! Ground tags (`_ s ? i d b '`) and the `array`/`map` tags have dedicated
//! paths; every other tag goes through the generic extension encoding.

use crate::cache::WriteCache;
use crate::emitter::{IntRep, Marshaller};
use crate::escape::{escape, ESC};
use crate::handlers::{tag, Handler, Handlers, Representation};
use crate::{Error, Result, TransitMap, TransitValue, TypedArray};

/// One recursive descent over a value graph.
pub(crate) struct Marshal<'a> {
    em: &'a mut dyn Marshaller,
    handlers: &'a Handlers,
    cache: &'a mut dyn WriteCache,
    depth: usize,
    max_depth: usize,
}

impl<'a> Marshal<'a> {
    pub(crate) fn new(
        em: &'a mut dyn Marshaller,
        handlers: &'a Handlers,
        cache: &'a mut dyn WriteCache,
        max_depth: usize,
    ) -> Self {
        Marshal {
            em,
            handlers,
            cache,
            depth: 0,
            max_depth,
        }
    }

    /// Writes a whole document. A root whose tag is a single character is
    /// quoted so the document never consists of a bare ground scalar.
    pub(crate) fn marshal_top(&mut self, value: &TransitValue) -> Result<()> {
        let handler = self.handler(value)?;
        let tag = handler.tag(value)?;
        if tag.chars().count() == 1 && tag != tag::QUOTE {
            self.emit_quoted(value)
        } else {
            self.marshal(value, false)
        }
    }

    fn handler(&self, value: &TransitValue) -> Result<&'a dyn Handler> {
        let handlers: &'a Handlers = self.handlers;
        handlers.get(value).ok_or_else(|| {
            Error::unsupported_value(format!(
                "no handler registered for type `{}`",
                value.type_key()
            ))
        })
    }

    fn marshal(&mut self, value: &TransitValue, as_map_key: bool) -> Result<()> {
        self.nested(|m| m.dispatch(value, as_map_key))
    }

    // Runs `f` one level deeper; the depth is restored on every exit path.
    fn nested<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if self.depth >= self.max_depth {
            return Err(Error::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, value: &TransitValue, as_map_key: bool) -> Result<()> {
        let handler = self.handler(value)?;
        let tag = handler.tag(value)?;
        let rep = handler.rep(value)?;

        match &*tag {
            tag::NULL => self.em.emit_nil(as_map_key, self.cache),
            tag::STRING => {
                let s = rep
                    .as_str()
                    .ok_or_else(|| Error::invalid_representation(&tag, "a string"))?;
                self.em
                    .emit_string("", "", &escape(s), as_map_key, self.cache)
            }
            tag::BOOLEAN => match rep.as_value() {
                Some(TransitValue::Bool(b)) => self.em.emit_boolean(*b, as_map_key, self.cache),
                _ => Err(Error::invalid_representation(&tag, "a boolean")),
            },
            tag::INTEGER => {
                let i = match rep.as_value() {
                    Some(TransitValue::Integer(i)) => IntRep::Small(*i),
                    Some(TransitValue::BigInt(b)) => IntRep::Big(b),
                    Some(TransitValue::String(s)) => IntRep::Text(s),
                    _ => return Err(Error::invalid_representation(&tag, "an integer")),
                };
                self.em.emit_integer(i, as_map_key, self.cache)
            }
            tag::FLOAT => match rep.as_value() {
                Some(TransitValue::Float(d)) => self.em.emit_double(*d, as_map_key, self.cache),
                Some(TransitValue::Integer(i)) => {
                    self.em.emit_double(*i as f64, as_map_key, self.cache)
                }
                _ => Err(Error::invalid_representation(&tag, "a float")),
            },
            tag::BINARY => match rep.as_value() {
                Some(TransitValue::Binary(b)) => self.em.emit_binary(b, as_map_key, self.cache),
                _ => Err(Error::invalid_representation(&tag, "binary data")),
            },
            tag::QUOTE => {
                if as_map_key {
                    return Err(Error::invalid_key(&tag));
                }
                match rep.as_value() {
                    Some(inner) => self.emit_quoted(inner),
                    None => Err(Error::invalid_representation(&tag, "a single value")),
                }
            }
            tag::ARRAY => {
                if as_map_key {
                    return Err(Error::invalid_key(&tag));
                }
                self.emit_array(&tag, &rep)
            }
            tag::MAP => {
                if as_map_key {
                    return Err(Error::invalid_key(&tag));
                }
                match rep.as_value() {
                    Some(TransitValue::Map(map)) => self.emit_map(map),
                    _ => Err(Error::invalid_representation(&tag, "a map")),
                }
            }
            _ => self.emit_encoded(handler, &tag, value, &rep, as_map_key),
        }
    }

    fn emit_quoted(&mut self, inner: &TransitValue) -> Result<()> {
        self.em.emit_map_start(1)?;
        self.em.emit_string(ESC, "#", tag::QUOTE, true, self.cache)?;
        self.marshal(inner, false)?;
        self.em.emit_map_end()
    }

    fn emit_array(&mut self, tag: &str, rep: &Representation<'_>) -> Result<()> {
        match rep {
            Representation::Seq(items) => self.emit_elements(items.iter().copied()),
            _ => match rep.as_value() {
                Some(TransitValue::Array(items)) => self.emit_elements(items.iter()),
                Some(TransitValue::TypedArray(typed)) => self.emit_typed_array(typed),
                _ => Err(Error::invalid_representation(tag, "a sequence")),
            },
        }
    }

    fn emit_elements<'v, I>(&mut self, items: I) -> Result<()>
    where
        I: ExactSizeIterator<Item = &'v TransitValue>,
    {
        self.em.emit_array_start(items.len())?;
        for item in items {
            self.marshal(item, false)?;
        }
        self.em.emit_array_end()
    }

    fn emit_typed_array(&mut self, typed: &TypedArray) -> Result<()> {
        self.em.emit_array_start(typed.len())?;
        match typed {
            TypedArray::I8(v) => self.emit_ints(v.iter().map(|&x| i64::from(x)))?,
            TypedArray::I16(v) => self.emit_ints(v.iter().map(|&x| i64::from(x)))?,
            TypedArray::I32(v) => self.emit_ints(v.iter().map(|&x| i64::from(x)))?,
            TypedArray::I64(v) => self.emit_ints(v.iter().copied())?,
            TypedArray::F32(v) => self.emit_doubles(v.iter().map(|&x| f64::from(x)))?,
            TypedArray::F64(v) => self.emit_doubles(v.iter().copied())?,
        }
        self.em.emit_array_end()
    }

    fn emit_ints(&mut self, ints: impl Iterator<Item = i64>) -> Result<()> {
        for i in ints {
            self.em.emit_integer(IntRep::Small(i), false, self.cache)?;
        }
        Ok(())
    }

    fn emit_doubles(&mut self, doubles: impl Iterator<Item = f64>) -> Result<()> {
        for d in doubles {
            self.em.emit_double(d, false, self.cache)?;
        }
        Ok(())
    }

    fn emit_map(&mut self, map: &TransitMap) -> Result<()> {
        if !self.has_stringable_keys(map)? {
            let flattened = map.iter().flat_map(|(k, v)| [k, v]).collect();
            return self.emit_tagged_map(tag::CMAP, &Representation::Seq(flattened));
        }
        self.em.emit_map_start(map.len())?;
        for (key, value) in map.iter() {
            self.marshal(key, true)?;
            self.marshal(value, false)?;
        }
        self.em.emit_map_end()
    }

    // Keys written as JSON object keys must have a single-character tag.
    fn has_stringable_keys(&self, map: &TransitMap) -> Result<bool> {
        for key in map.keys() {
            let tag = self.handler(key)?.tag(key)?;
            if tag.chars().count() != 1 || tag == tag::QUOTE {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn emit_tagged_map(&mut self, tag: &str, rep: &Representation<'_>) -> Result<()> {
        self.em.emit_map_start(1)?;
        self.em.emit_string(ESC, "#", tag, true, self.cache)?;
        self.marshal_rep(rep)?;
        self.em.emit_map_end()
    }

    fn marshal_rep(&mut self, rep: &Representation<'_>) -> Result<()> {
        match rep {
            Representation::Borrowed(value) => self.marshal(value, false),
            Representation::Owned(value) => self.marshal(value, false),
            Representation::Seq(items) => {
                self.nested(|m| m.emit_elements(items.iter().copied()))
            }
        }
    }

    fn emit_encoded(
        &mut self,
        handler: &dyn Handler,
        tag: &str,
        value: &TransitValue,
        rep: &Representation<'_>,
        as_map_key: bool,
    ) -> Result<()> {
        if tag.chars().count() == 1 {
            if let Some(s) = rep.as_str() {
                self.em.emit_string(ESC, tag, s, as_map_key, self.cache)
            } else if as_map_key || self.em.prefers_strings() {
                match handler.string_rep(value) {
                    Some(s) => self.em.emit_string(ESC, tag, &s, as_map_key, self.cache),
                    None => Err(Error::unsupported_value(format!(
                        "value tagged `{tag}` has no string representation"
                    ))),
                }
            } else {
                self.emit_tagged_map(tag, rep)
            }
        } else if as_map_key {
            Err(Error::invalid_key(tag))
        } else {
            self.emit_tagged_map(tag, rep)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{NoCache, RollingCache};
    use crate::emitter::JsonMarshaller;
    use crate::{transit, TransitSet};

    fn write_with(value: &TransitValue, prefer_strings: bool, caching: bool) -> Result<String> {
        let handlers = Handlers::new();
        let mut em = JsonMarshaller::new(prefer_strings);
        let mut rolling = RollingCache::new();
        let mut none = NoCache;
        let cache: &mut dyn WriteCache = if caching { &mut rolling } else { &mut none };
        Marshal::new(&mut em, &handlers, cache, 64).marshal_top(value)?;
        em.flush()
    }

    fn write(value: &TransitValue) -> String {
        write_with(value, true, false).unwrap()
    }

    #[test]
    fn test_top_level_scalars_are_quoted() {
        assert_eq!(write(&TransitValue::Bool(true)), r#"{"~#'":true}"#);
        assert_eq!(write(&TransitValue::Null), r#"{"~#'":null}"#);
        assert_eq!(write(&TransitValue::from("foo")), r#"{"~#'":"foo"}"#);
        assert_eq!(write(&TransitValue::keyword("k")), r#"{"~#'":"~:k"}"#);
    }

    #[test]
    fn test_explicit_quote_is_not_doubled() {
        let quoted = TransitValue::quote(TransitValue::from(1));
        assert_eq!(write(&quoted), r#"{"~#'":1}"#);
        let nested = TransitValue::from(vec![quoted]);
        assert_eq!(write(&nested), r#"[{"~#'":1}]"#);
    }

    #[test]
    fn test_map_and_array() {
        let value = transit!({"a": 1, "b": [1, 2, 3]});
        assert_eq!(write(&value), r#"{"a":1,"b":[1,2,3]}"#);
    }

    #[test]
    fn test_strings_are_escaped() {
        let value = transit!(["~x", "^y", "`~z", "plain"]);
        assert_eq!(write(&value), r#"["~~x","~^y","~z","plain"]"#);
    }

    #[test]
    fn test_natural_keys() {
        let mut map = TransitMap::new();
        map.insert(1, "int");
        map.insert(true, "bool");
        map.insert(TransitValue::Null, "nil");
        map.insert(2.5, "float");
        map.insert(TransitValue::keyword("kw"), "keyword");
        map.insert("~tilde", "string");
        assert_eq!(
            write(&TransitValue::Map(map)),
            r#"{"~i1":"int","~?t":"bool","~_":"nil","~d2.5":"float","~:kw":"keyword","~~tilde":"string"}"#
        );
    }

    #[test]
    fn test_composite_keys_use_cmap() {
        let mut map = TransitMap::new();
        map.insert(transit!([1, 2]), "pair");
        map.insert("plain", 3);
        assert_eq!(
            write(&TransitValue::Map(map)),
            r#"{"~#cmap":[[1,2],"pair","plain",3]}"#
        );
    }

    #[test]
    fn test_sets() {
        let set: TransitSet = [1, 2].into_iter().map(TransitValue::from).collect();
        assert_eq!(write(&TransitValue::Set(set)), r#"{"~#set":[1,2]}"#);
    }

    #[test]
    fn test_typed_arrays() {
        let ints = TransitValue::TypedArray(TypedArray::I16(vec![1, -2, 300]));
        assert_eq!(write(&ints), "[1,-2,300]");

        let floats = TransitValue::TypedArray(TypedArray::F64(vec![1.5, 2.0]));
        assert_eq!(write(&floats), "[1.5,2.0]");

        let longs = TransitValue::TypedArray(TypedArray::I64(vec![1 << 53]));
        assert_eq!(write(&longs), r#"["~i9007199254740992"]"#);
    }

    #[test]
    fn test_dates() {
        use chrono::{TimeZone, Utc};
        let dt = Utc.timestamp_millis_opt(1_000).unwrap();
        let value = TransitValue::from(vec![TransitValue::Date(dt)]);
        assert_eq!(write_with(&value, true, false).unwrap(), r#"["~m1000"]"#);
        assert_eq!(
            write_with(&value, false, false).unwrap(),
            r#"[{"~#m":1000}]"#
        );
    }

    #[test]
    fn test_tagged_values() {
        let point = TransitValue::tagged("point", transit!([1, 2]));
        assert_eq!(write(&point), r#"{"~#point":[1,2]}"#);

        let single = TransitValue::tagged("u", TransitValue::from("abc"));
        assert_eq!(write(&transit!([single])), r#"["~uabc"]"#);
    }

    #[test]
    fn test_as_tag() {
        let v = TransitValue::as_tag("r", TransitValue::Array(vec![]), Some("http://x".into()));
        assert_eq!(write(&transit!([v])), r#"["~rhttp://x"]"#);

        let no_string = TransitValue::as_tag("r", TransitValue::Array(vec![]), None);
        assert!(matches!(
            write_with(&transit!([no_string]), true, false),
            Err(Error::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_extension_key_rejected() {
        let mut map = TransitMap::new();
        map.insert(TransitValue::tagged("u", transit!([1])), 1);
        // single-character tag but no string form: keys must be strings
        assert!(matches!(
            write_with(&TransitValue::Map(map), false, false),
            Err(Error::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_unsupported_custom() {
        let value = transit!([TransitValue::custom("point", TransitValue::Null)]);
        assert!(matches!(
            write_with(&value, true, false),
            Err(Error::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut value = TransitValue::from(1);
        for _ in 0..100 {
            value = TransitValue::from(vec![value]);
        }
        assert!(matches!(
            write_with(&value, true, false),
            Err(Error::NestingTooDeep { limit: 64 })
        ));
    }

    #[test]
    fn test_depth_restored_after_failure() {
        let handlers = Handlers::new();
        let mut em = JsonMarshaller::default();
        let mut cache = NoCache;
        let mut m = Marshal::new(&mut em, &handlers, &mut cache, 3);

        let too_deep = transit!([[[[1]]]]);
        assert!(matches!(
            m.marshal_top(&too_deep),
            Err(Error::NestingTooDeep { limit: 3 })
        ));
        assert_eq!(m.depth, 0);

        let unsupported = transit!([[TransitValue::custom("point", TransitValue::Null)]]);
        assert!(m.marshal_top(&unsupported).is_err());
        assert_eq!(m.depth, 0);
    }

    #[test]
    fn test_cache_codes_for_keys_and_tags() {
        let set: TransitSet = [TransitValue::from(1)].into_iter().collect();
        let value = transit!([
            {"name": 1},
            {"name": 2},
            TransitValue::Set(set.clone()),
            TransitValue::Set(set),
            TransitValue::keyword("status"),
            TransitValue::keyword("status")
        ]);
        assert_eq!(
            write_with(&value, true, true).unwrap(),
            r#"[{"name":1},{"^0":2},{"~#set":[1]},{"^1":[1]},"~:status","^2"]"#
        );
    }
}

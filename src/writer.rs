//! The public writer: a marshaller, a handler registry and options.

use crate::cache::{NoCache, RollingCache, WriteCache};
use crate::emitter::{JsonMarshaller, Marshaller};
use crate::handlers::{Handler, Handlers};
use crate::marshal::Marshal;
use crate::ser::to_value;
use crate::{Format, Result, TransitValue, WriterOptions};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Writes [`TransitValue`]s as Transit documents.
///
/// A writer owns its handler registry, so registering a handler on one
/// writer never affects another. Writes take `&mut self`; a writer handles
/// one document at a time and is ready for the next as soon as `write`
/// returns, whether it succeeded or not.
///
/// # Examples
///
/// ```rust
/// use serde_transit::{transit, Format, Writer, WriterOptions};
///
/// let mut w = Writer::new(Format::Json, WriterOptions::new().with_caching(false));
/// let doc = w.write(&transit!({"a": 1, "b": [1, 2, 3]})).unwrap();
/// assert_eq!(doc, r#"{"a":1,"b":[1,2,3]}"#);
/// ```
pub struct Writer {
    marshaller: Box<dyn Marshaller + Send>,
    handlers: Handlers,
    options: WriterOptions,
}

impl Writer {
    /// Creates a writer for `format` with the built-in handlers installed.
    #[must_use]
    pub fn new(format: Format, options: WriterOptions) -> Self {
        let marshaller = match format {
            Format::Json => JsonMarshaller::new(options.prefer_strings),
        };
        debug!(%format, ?options, "creating transit writer");
        Writer {
            marshaller: Box::new(marshaller),
            handlers: Handlers::new(),
            options,
        }
    }

    /// Creates a writer that emits through a caller-supplied marshaller.
    ///
    /// `options.prefer_strings` is ignored; the marshaller reports its own
    /// preference through [`Marshaller::prefers_strings`].
    pub fn with_marshaller<M>(marshaller: M, options: WriterOptions) -> Self
    where
        M: Marshaller + Send + 'static,
    {
        Writer {
            marshaller: Box::new(marshaller),
            handlers: Handlers::new(),
            options,
        }
    }

    /// Installs `handler` for values whose type key is `type_key`.
    ///
    /// A later registration for the same key replaces the earlier one; the
    /// replaced handler is returned.
    pub fn register<H>(&mut self, type_key: &str, handler: H) -> Option<Arc<dyn Handler>>
    where
        H: Handler + 'static,
    {
        let replaced = self.handlers.register(type_key, handler);
        debug!(type_key, replaced = replaced.is_some(), "registered transit handler");
        replaced
    }

    /// The handler registry used by this writer.
    #[must_use]
    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// The options this writer was created with.
    #[must_use]
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Writes one document.
    ///
    /// # Errors
    ///
    /// Fails when a value has no handler, a handler produces an unusable
    /// representation, a composite value sits in a key position, or the
    /// value nests deeper than the configured limit. The writer is reset
    /// either way.
    pub fn write(&mut self, value: &TransitValue) -> Result<String> {
        if self.options.caching {
            let mut cache = RollingCache::new();
            let doc = self.write_with_cache(value, &mut cache)?;
            trace!(entries = cache.len(), "rolling cache discarded");
            Ok(doc)
        } else {
            self.write_with_cache(value, &mut NoCache)
        }
    }

    /// Writes one document, passing candidate strings through `cache`.
    ///
    /// The `caching` option is ignored. Errors reported by the cache abort
    /// the write and are returned unchanged.
    ///
    /// # Errors
    ///
    /// See [`Writer::write`].
    pub fn write_with_cache(
        &mut self,
        value: &TransitValue,
        cache: &mut dyn WriteCache,
    ) -> Result<String> {
        let result = Marshal::new(
            self.marshaller.as_mut(),
            &self.handlers,
            cache,
            self.options.max_depth,
        )
        .marshal_top(value);

        match result.and_then(|()| self.marshaller.flush()) {
            Ok(doc) => {
                debug!(bytes = doc.len(), "wrote transit document");
                Ok(doc)
            }
            Err(err) => {
                self.marshaller.reset();
                debug!(error = %err, "transit write failed");
                Err(err)
            }
        }
    }

    /// Converts `value` through serde and writes it.
    ///
    /// # Errors
    ///
    /// Fails when the conversion fails or for any reason [`Writer::write`]
    /// does.
    pub fn write_serialize<T>(&mut self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        let value = to_value(value)?;
        self.write(&value)
    }
}

impl Default for Writer {
    fn default() -> Self {
        Writer::new(Format::default(), WriterOptions::default())
    }
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("handlers", &self.handlers)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Representation;
    use crate::{transit, Error};
    use std::borrow::Cow;

    struct PointHandler;

    impl Handler for PointHandler {
        fn tag<'a>(&self, _value: &'a TransitValue) -> Result<Cow<'a, str>> {
            Ok(Cow::Borrowed("point"))
        }

        fn rep<'a>(&self, value: &'a TransitValue) -> Result<Representation<'a>> {
            match value {
                TransitValue::Custom(c) => Ok(Representation::Borrowed(&c.payload)),
                other => Err(Error::unsupported_value(other.type_key())),
            }
        }
    }

    fn point(x: i64, y: i64) -> TransitValue {
        TransitValue::custom("point", transit!([x, y]))
    }

    #[test]
    fn test_write_top_level_scalar() {
        let mut w = Writer::default();
        assert_eq!(w.write(&TransitValue::Bool(true)).unwrap(), r#"{"~#'":true}"#);
    }

    #[test]
    fn test_register_custom_handler() {
        let mut w = Writer::default();
        assert!(matches!(
            w.write(&point(1, 2)),
            Err(Error::UnsupportedValue(_))
        ));

        assert!(w.register("point", PointHandler).is_none());
        assert_eq!(w.write(&point(1, 2)).unwrap(), r#"{"~#point":[1,2]}"#);
        assert!(w.handlers().contains("point"));
    }

    #[test]
    fn test_registries_are_per_writer() {
        let mut a = Writer::default();
        let mut b = Writer::default();
        a.register("point", PointHandler);
        assert!(a.write(&point(0, 0)).is_ok());
        assert!(b.write(&point(0, 0)).is_err());
    }

    #[test]
    fn test_writer_reusable_after_error() {
        let mut w = Writer::default();
        let bad = transit!([1, [2, TransitValue::custom("nope", TransitValue::Null)]]);
        assert!(w.write(&bad).is_err());
        assert_eq!(w.write(&transit!([1, 2])).unwrap(), "[1,2]");
    }

    #[test]
    fn test_cache_is_fresh_per_write() {
        let mut w = Writer::default();
        let value = transit!([{"name": 1}, {"name": 2}]);
        let first = w.write(&value).unwrap();
        let second = w.write(&value).unwrap();
        assert_eq!(first, r#"[{"name":1},{"^0":2}]"#);
        assert_eq!(first, second);
    }

    #[test]
    fn test_caching_disabled() {
        let mut w = Writer::new(Format::Json, WriterOptions::new().with_caching(false));
        let value = transit!([{"name": 1}, {"name": 2}]);
        assert_eq!(w.write(&value).unwrap(), r#"[{"name":1},{"name":2}]"#);
    }

    #[test]
    fn test_with_marshaller() {
        let mut w = Writer::with_marshaller(JsonMarshaller::new(false), WriterOptions::default());
        let huge = TransitValue::from(i64::MAX);
        assert_eq!(
            w.write(&transit!([huge])).unwrap(),
            "[9223372036854775807]"
        );
    }

    #[test]
    fn test_write_serialize() {
        #[derive(Serialize)]
        struct Item {
            id: u32,
            label: &'static str,
        }

        let mut w = Writer::default();
        let doc = w
            .write_serialize(&vec![Item { id: 1, label: "a" }, Item { id: 2, label: "b" }])
            .unwrap();
        assert_eq!(doc, r#"[{"id":1,"label":"a"},{"id":2,"^0":"b"}]"#);
    }

    struct RefusingCache;

    impl WriteCache for RefusingCache {
        fn write<'a>(&mut self, candidate: &'a str, _as_map_key: bool) -> Result<Cow<'a, str>> {
            Err(Error::cache(format!("refused `{candidate}`")))
        }
    }

    #[test]
    fn test_cache_errors_propagate() {
        let mut w = Writer::default();
        let result = w.write_with_cache(&transit!({"key": 1}), &mut RefusingCache);
        assert!(matches!(result, Err(Error::Cache(msg)) if msg.contains("key")));

        // arrays of bare numbers never consult the cache
        let doc = w.write_with_cache(&transit!([1, 2]), &mut RefusingCache);
        assert_eq!(doc.unwrap(), "[1,2]");
    }
}

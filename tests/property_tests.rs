//! Property-based tests over generated inputs.
//!
//! Every document must parse as JSON, containers must balance, integers must
//! fall on the right side of the 2^53 boundary and escaping must keep
//! marker-initial strings distinguishable from tagged ones.

use proptest::prelude::*;
use serde_transit::escape::escape;
use serde_transit::{to_string, to_string_with_options, TransitMap, TransitValue, Writer, WriterOptions};
use std::collections::BTreeMap;

const JSON_INT_MAX: i64 = 1 << 53;

fn parses(doc: &str) -> bool {
    match serde_json::from_str::<serde_json::Value>(doc) {
        Ok(_) => true,
        Err(e) => {
            eprintln!("Invalid JSON ({}): {}", e, doc);
            false
        }
    }
}

fn arb_scalar() -> impl Strategy<Value = TransitValue> {
    prop_oneof![
        Just(TransitValue::Null),
        any::<bool>().prop_map(TransitValue::Bool),
        any::<i64>().prop_map(TransitValue::Integer),
        any::<f64>().prop_map(TransitValue::Float),
        ".*".prop_map(TransitValue::String),
        "[a-z]{1,8}".prop_map(TransitValue::keyword),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(TransitValue::Binary),
    ]
}

fn arb_value() -> impl Strategy<Value = TransitValue> {
    arb_scalar().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(TransitValue::Array),
            prop::collection::vec((inner.clone(), inner), 0..6)
                .prop_map(|entries| TransitValue::Map(entries.into_iter().collect::<TransitMap>())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_documents_are_json(value in arb_value()) {
        let mut w = Writer::default();
        let doc = w.write(&value).unwrap();
        prop_assert!(parses(&doc));
    }

    #[test]
    fn prop_documents_are_json_without_cache(value in arb_value()) {
        let mut w = Writer::new(Default::default(), WriterOptions::new().with_caching(false));
        let doc = w.write(&value).unwrap();
        prop_assert!(parses(&doc));
    }

    #[test]
    fn prop_root_is_container(value in arb_value()) {
        let doc = Writer::default().write(&value).unwrap();
        let is_container = doc.starts_with('[') || doc.starts_with('{');
        prop_assert!(is_container, "root is not a container: {}", doc);
    }

    #[test]
    fn prop_integer_boundary(n in any::<i64>()) {
        let doc = to_string(&vec![n]).unwrap();
        if n > -JSON_INT_MAX && n < JSON_INT_MAX {
            prop_assert_eq!(doc, format!("[{n}]"));
        } else {
            prop_assert_eq!(doc, format!("[\"~i{n}\"]"));
        }
    }

    #[test]
    fn prop_integer_keys_are_strings(n in any::<i64>()) {
        let mut map = BTreeMap::new();
        map.insert(n, 0);
        let options = WriterOptions::new().with_caching(false);
        prop_assert_eq!(to_string_with_options(&map, options).unwrap(), format!("{{\"~i{n}\":0}}"));
    }

    #[test]
    fn prop_escape_passthrough(s in "[^~^`].*") {
        prop_assert_eq!(escape(&s), s.as_str());
    }

    #[test]
    fn prop_escape_marker_strings(s in "[~^`].*") {
        let escaped = escape(&s);
        if let Some(rest) = s.strip_prefix("`~") {
            prop_assert_eq!(escaped.into_owned(), format!("~{rest}"));
        } else {
            prop_assert_eq!(escaped.into_owned(), format!("~{s}"));
        }
    }

    #[test]
    fn prop_strings_survive_json(s in ".*") {
        let options = WriterOptions::new().with_caching(false);
        let doc = to_string_with_options(&vec![s.clone()], options).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&doc).unwrap();
        prop_assert_eq!(parsed[0].clone(), escape(&s).into_owned());
    }

    #[test]
    fn prop_repeated_keys_cached(keys in prop::collection::btree_set("[a-z]{4,8}", 1..10)) {
        let record: BTreeMap<String, i32> = keys.iter().map(|k| (k.clone(), 1)).collect();
        let doc = to_string(&vec![record.clone(), record]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&doc).unwrap();
        let second = parsed[1].as_object().unwrap();
        prop_assert_eq!(second.len(), keys.len());
        prop_assert!(second.keys().all(|k| k.starts_with('^')));
    }
}

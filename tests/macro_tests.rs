use serde_transit::{transit, Writer, TransitMap, TransitValue};

#[test]
fn test_transit_macro_null() {
    let value = transit!(null);
    assert_eq!(value, TransitValue::Null);
}

#[test]
fn test_transit_macro_booleans() {
    assert_eq!(transit!(true), TransitValue::Bool(true));
    assert_eq!(transit!(false), TransitValue::Bool(false));
}

#[test]
fn test_transit_macro_numbers() {
    assert_eq!(transit!(42), TransitValue::Integer(42));
    assert_eq!(transit!(3.5), TransitValue::Float(3.5));
    assert_eq!(transit!(-123), TransitValue::Integer(-123));
    assert!(matches!(transit!(u64::MAX), TransitValue::BigInt(_)));
}

#[test]
fn test_transit_macro_strings() {
    assert_eq!(
        transit!("hello world"),
        TransitValue::String("hello world".to_string())
    );
    assert_eq!(transit!(""), TransitValue::String(String::new()));
}

#[test]
fn test_transit_macro_arrays() {
    assert_eq!(transit!([]), TransitValue::Array(vec![]));
    assert_eq!(
        transit!([1, 2, 3]),
        TransitValue::Array(vec![
            TransitValue::Integer(1),
            TransitValue::Integer(2),
            TransitValue::Integer(3),
        ])
    );
    assert_eq!(
        transit!([null, true, [false]]),
        TransitValue::Array(vec![
            TransitValue::Null,
            TransitValue::Bool(true),
            TransitValue::Array(vec![TransitValue::Bool(false)]),
        ])
    );
}

#[test]
fn test_transit_macro_maps() {
    let value = transit!({
        "name": "Alice",
        "age": 30,
        "address": {
            "city": "Springfield",
            "zip": null
        },
        "scores": [1, 2],
    });

    let mut address = TransitMap::new();
    address.insert("city", "Springfield");
    address.insert("zip", TransitValue::Null);

    let mut expected = TransitMap::new();
    expected.insert("name", "Alice");
    expected.insert("age", 30);
    expected.insert("address", address);
    expected.insert("scores", vec![TransitValue::from(1), TransitValue::from(2)]);

    assert_eq!(value, TransitValue::Map(expected));
}

#[test]
fn test_transit_macro_literal_keys() {
    let value = transit!({1: "one", true: "yes"});
    let map = value.as_map().unwrap();
    assert_eq!(map.get(&TransitValue::Integer(1)), Some(&TransitValue::from("one")));
    assert_eq!(map.get(&TransitValue::Bool(true)), Some(&TransitValue::from("yes")));
}

#[test]
fn test_transit_macro_expressions() {
    let name = String::from("Zed");
    let value = transit!({
        "name": name.clone(),
        "status": TransitValue::keyword("active"),
        "maybe": Some(5)
    });
    let map = value.as_map().unwrap();
    assert_eq!(map.get(&"name".into()), Some(&TransitValue::from(name)));
    assert_eq!(map.get(&"maybe".into()), Some(&TransitValue::Integer(5)));
}

#[test]
fn test_transit_macro_written() {
    let mut w = Writer::default();
    let doc = w
        .write(&transit!({"a": 1, "b": [1, 2, 3], "c": {"~d": null}}))
        .unwrap();
    assert_eq!(doc, r#"{"a":1,"b":[1,2,3],"c":{"~~d":null}}"#);
}

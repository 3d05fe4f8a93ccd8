/// Builds a [`TransitValue`](crate::TransitValue) from JSON-like syntax.
///
/// `null`, `true` and `false` map to their Transit counterparts, `[...]`
/// builds an array and `{...}` builds a map with literal keys. Any other
/// expression is converted with `TransitValue::from`, so keywords, dates and
/// tagged values can be spliced in directly.
///
/// ```rust
/// use serde_transit::{transit, TransitValue};
///
/// let value = transit!({
///     "name": "Alice",
///     "tags": [TransitValue::keyword("admin"), null],
///     "score": 9.5
/// });
/// assert_eq!(value.as_map().map(|m| m.len()), Some(3));
/// ```
#[macro_export]
macro_rules! transit {
    (null) => {
        $crate::TransitValue::Null
    };

    (true) => {
        $crate::TransitValue::Bool(true)
    };

    (false) => {
        $crate::TransitValue::Bool(false)
    };

    ([]) => {
        $crate::TransitValue::Array(vec![])
    };

    ([ $($tt:tt)+ ]) => {
        $crate::TransitValue::Array($crate::transit!(@array [] $($tt)+))
    };

    ({}) => {
        $crate::TransitValue::Map($crate::TransitMap::new())
    };

    ({ $($tt:tt)+ }) => {{
        let mut map = $crate::TransitMap::new();
        $crate::transit!(@object map $($tt)+);
        $crate::TransitValue::Map(map)
    }};

    // Array elements, accumulated one at a time.
    (@array [$($elems:expr,)*]) => {
        vec![$($elems,)*]
    };

    (@array [$($elems:expr,)*] null $(, $($rest:tt)*)?) => {
        $crate::transit!(@array [$($elems,)* $crate::transit!(null),] $($($rest)*)?)
    };

    (@array [$($elems:expr,)*] true $(, $($rest:tt)*)?) => {
        $crate::transit!(@array [$($elems,)* $crate::transit!(true),] $($($rest)*)?)
    };

    (@array [$($elems:expr,)*] false $(, $($rest:tt)*)?) => {
        $crate::transit!(@array [$($elems,)* $crate::transit!(false),] $($($rest)*)?)
    };

    (@array [$($elems:expr,)*] [$($inner:tt)*] $(, $($rest:tt)*)?) => {
        $crate::transit!(@array [$($elems,)* $crate::transit!([$($inner)*]),] $($($rest)*)?)
    };

    (@array [$($elems:expr,)*] {$($inner:tt)*} $(, $($rest:tt)*)?) => {
        $crate::transit!(@array [$($elems,)* $crate::transit!({$($inner)*}),] $($($rest)*)?)
    };

    (@array [$($elems:expr,)*] $next:expr, $($rest:tt)*) => {
        $crate::transit!(@array [$($elems,)* $crate::TransitValue::from($next),] $($rest)*)
    };

    (@array [$($elems:expr,)*] $last:expr) => {
        $crate::transit!(@array [$($elems,)* $crate::TransitValue::from($last),])
    };

    // Map entries, inserted one at a time.
    (@object $map:ident) => {};

    (@object $map:ident $key:literal : null $(, $($rest:tt)*)?) => {
        $map.insert($key, $crate::transit!(null));
        $crate::transit!(@object $map $($($rest)*)?);
    };

    (@object $map:ident $key:literal : true $(, $($rest:tt)*)?) => {
        $map.insert($key, $crate::transit!(true));
        $crate::transit!(@object $map $($($rest)*)?);
    };

    (@object $map:ident $key:literal : false $(, $($rest:tt)*)?) => {
        $map.insert($key, $crate::transit!(false));
        $crate::transit!(@object $map $($($rest)*)?);
    };

    (@object $map:ident $key:literal : [$($inner:tt)*] $(, $($rest:tt)*)?) => {
        $map.insert($key, $crate::transit!([$($inner)*]));
        $crate::transit!(@object $map $($($rest)*)?);
    };

    (@object $map:ident $key:literal : {$($inner:tt)*} $(, $($rest:tt)*)?) => {
        $map.insert($key, $crate::transit!({$($inner)*}));
        $crate::transit!(@object $map $($($rest)*)?);
    };

    (@object $map:ident $key:literal : $value:expr, $($rest:tt)*) => {
        $map.insert($key, $crate::TransitValue::from($value));
        $crate::transit!(@object $map $($rest)*);
    };

    (@object $map:ident $key:literal : $value:expr) => {
        $map.insert($key, $crate::TransitValue::from($value));
    };

    ($other:expr) => {
        $crate::TransitValue::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{TransitMap, TransitValue};

    #[test]
    fn test_transit_macro_primitives() {
        assert_eq!(transit!(null), TransitValue::Null);
        assert_eq!(transit!(true), TransitValue::Bool(true));
        assert_eq!(transit!(false), TransitValue::Bool(false));
        assert_eq!(transit!(42), TransitValue::Integer(42));
        assert_eq!(transit!(-7), TransitValue::Integer(-7));
        assert_eq!(transit!(3.5), TransitValue::Float(3.5));
        assert_eq!(transit!("hello"), TransitValue::String("hello".to_string()));
    }

    #[test]
    fn test_transit_macro_arrays() {
        assert_eq!(transit!([]), TransitValue::Array(vec![]));

        let arr = transit!([1, -2, null, [true], "x",]);
        match arr {
            TransitValue::Array(vec) => {
                assert_eq!(vec.len(), 5);
                assert_eq!(vec[1], TransitValue::Integer(-2));
                assert_eq!(vec[2], TransitValue::Null);
                assert_eq!(vec[3], TransitValue::Array(vec![TransitValue::Bool(true)]));
            }
            _ => panic!("Expected array"),
        }
    }

    #[test]
    fn test_transit_macro_maps() {
        assert_eq!(transit!({}), TransitValue::Map(TransitMap::new()));

        let obj = transit!({
            "name": "Alice",
            "age": 30,
            "role": TransitValue::keyword("admin"),
            "nested": {"ok": true}
        });

        match obj {
            TransitValue::Map(map) => {
                assert_eq!(map.len(), 4);
                assert_eq!(map.get(&"name".into()), Some(&TransitValue::from("Alice")));
                assert_eq!(map.get(&"role".into()), Some(&TransitValue::keyword("admin")));
                assert!(map.get(&"nested".into()).is_some_and(TransitValue::is_map));
            }
            _ => panic!("Expected map"),
        }
    }
}

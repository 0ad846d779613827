//! Differential tests against Serde JSON through the `serde_json` feature.
#![cfg(feature = "serde_json")]

use peejay::serde_json::{from_slice, from_slice_with_options};
use peejay::{Error, Extensions, ParserOptionsBuilder};
use serde_json::json;
use test_log::test;

#[test]
fn object() {
    let value = from_slice(br#"{"name": "Elvis", "age": 42}"#).unwrap();
    assert_eq!(value, json!({"name": "Elvis", "age": 42}));
}

#[test]
fn scalars() {
    assert_eq!(from_slice(b"null").unwrap(), json!(null));
    assert_eq!(from_slice(b"true").unwrap(), json!(true));
    assert_eq!(from_slice(b"-17").unwrap(), json!(-17));
    assert_eq!(from_slice(b"2.5").unwrap(), json!(2.5));
    assert_eq!(from_slice(br#""x""#).unwrap(), json!("x"));
}

#[test]
fn matches_serde_json_on_nested_documents() {
    let doc = br#"{"a": [1, 2.25, {"b": [true, null]}], "c": {"d": "e"}}"#;
    let ours = from_slice(doc).unwrap();
    let theirs: serde_json::Value = serde_json::from_slice(doc).unwrap();
    assert_eq!(ours, theirs);
}

#[test]
fn integral_floats_become_integers() {
    // The parser reconciles 1.0 to the integer 1, so the two spellings are
    // indistinguishable here by design.
    assert_eq!(from_slice(b"1.0").unwrap(), json!(1));
}

#[test]
fn duplicate_keys_keep_the_last_value() {
    let value = from_slice(br#"{"a": 1, "a": 2}"#).unwrap();
    assert_eq!(value, json!({"a": 2}));
}

#[test]
fn errors_surface() {
    assert_eq!(from_slice(b"[1,,2]"), Err(Error::ExpectedToken));
    assert_eq!(from_slice(b""), Err(Error::ExpectedToken));
}

/// Serde JSON cannot represent Infinity; the builder reports it as out of
/// range rather than inventing a value.
#[test]
fn infinity_is_unrepresentable() {
    let options = ParserOptionsBuilder::default()
        .with_extensions(Extensions::NUMBERS)
        .build();
    assert_eq!(
        from_slice_with_options(b"Infinity", options),
        Err(Error::NumberOutOfRange)
    );
}

#[test]
fn extensions_apply() {
    let options = ParserOptionsBuilder::default()
        .with_extensions(Extensions::ALL)
        .build();
    let value =
        from_slice_with_options(b"{a: 1, 'b': 0x10, /* c */ \"d\": [1,],}", options).unwrap();
    assert_eq!(value, json!({"a": 1, "b": 16, "d": [1]}));
}

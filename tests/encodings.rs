//! Encoding detection: the same document in any of the five accepted
//! encodings, with or without a BOM, produces identical events.

mod recorder;

use peejay::{Error, Parser};
use recorder::{events, Event, Recorder};
use test_log::test;

fn utf8_bom(s: &str) -> Vec<u8> {
    let mut v = vec![0xEF, 0xBB, 0xBF];
    v.extend_from_slice(s.as_bytes());
    v
}

fn utf16_be(s: &str) -> Vec<u8> {
    let mut v = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        v.extend_from_slice(&unit.to_be_bytes());
    }
    v
}

fn utf16_le(s: &str) -> Vec<u8> {
    let mut v = vec![0xFF, 0xFE];
    for unit in s.encode_utf16() {
        v.extend_from_slice(&unit.to_le_bytes());
    }
    v
}

fn utf32_be(s: &str) -> Vec<u8> {
    let mut v = vec![0x00, 0x00, 0xFE, 0xFF];
    for c in s.chars() {
        v.extend_from_slice(&(c as u32).to_be_bytes());
    }
    v
}

fn utf32_le(s: &str) -> Vec<u8> {
    let mut v = vec![0xFF, 0xFE, 0x00, 0x00];
    for c in s.chars() {
        v.extend_from_slice(&(c as u32).to_le_bytes());
    }
    v
}

#[test]
fn all_encodings_agree() {
    let doc = r#"{"musical 𝄞": [1, true, "é"], "n": null}"#;
    let (expected, experr) = events(doc.as_bytes());
    assert_eq!(experr, None);

    for (name, bytes) in [
        ("utf8+bom", utf8_bom(doc)),
        ("utf16be", utf16_be(doc)),
        ("utf16le", utf16_le(doc)),
        ("utf32be", utf32_be(doc)),
        ("utf32le", utf32_le(doc)),
    ] {
        let (ev, err) = events(&bytes);
        assert_eq!(err, None, "{name}");
        assert_eq!(ev, expected, "{name}");
    }
}

/// Chunk boundaries falling inside the BOM, inside a UTF-16 code unit, or
/// inside a surrogate pair change nothing.
#[test]
fn encodings_survive_any_chunking() {
    let doc = r#"["𝄞", 42]"#;
    let (expected, experr) = events(doc.as_bytes());
    assert_eq!(experr, None);

    for bytes in [utf16_be(doc), utf16_le(doc), utf32_be(doc), utf32_le(doc)] {
        for chunk in 1..bytes.len() {
            let mut parser = Parser::new(Recorder::default());
            for piece in bytes.chunks(chunk) {
                parser.input(piece);
            }
            let ev = parser.eof();
            assert_eq!(parser.last_error(), None, "chunk size {chunk}");
            assert_eq!(ev, expected, "chunk size {chunk}");
        }
    }
}

/// The BOM is consumed silently: positions start at (1,1) as if it were
/// not there.
#[test]
fn bom_does_not_count_as_input() {
    let mut parser = Parser::new(Recorder::default());
    parser.input(&utf8_bom("null")).eof();
    assert!(!parser.has_error());
    assert_eq!(parser.pos(), peejay::Coord::new(1, 1));
    assert_eq!(parser.input_pos(), peejay::Coord::new(1, 5));
}

#[test]
fn utf16_string_content() {
    let (ev, err) = events(&utf16_be(r#""héllo𝄞""#));
    assert_eq!(err, None);
    assert_eq!(ev, vec![Event::String("héllo𝄞".to_owned())]);
}

/// An ill-formed byte becomes U+FFFD, which is not a token.
#[test]
fn ill_formed_utf8_at_top_level() {
    let (ev, err) = events(b"\xFF");
    assert_eq!(ev, vec![]);
    assert_eq!(err, Some(Error::ExpectedToken));
}

/// A lone UTF-16 surrogate in the input becomes U+FFFD; inside a string
/// that replacement character is accepted as ordinary content.
#[test]
fn utf16_lone_surrogate_inside_string() {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in [0x0022u16, 0xD834, 0x0022] {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    let (ev, err) = events(&bytes);
    assert_eq!(err, None);
    assert_eq!(ev, vec![Event::String("\u{FFFD}".to_owned())]);
}

/// A truncated multi-byte sequence at end of input is flushed as U+FFFD by
/// eof(), which the grammar then rejects appropriately.
#[test]
fn truncated_sequence_at_eof() {
    let mut parser = Parser::new(Recorder::default());
    // "1" then the first byte of a two-byte sequence: the replacement
    // character terminates the number but trips the EOF sentinel.
    parser.input(b"1\xC3");
    let ev = parser.eof();
    assert_eq!(ev, vec![Event::Integer(1)]);
    assert_eq!(parser.last_error(), Some(Error::UnexpectedExtraInput));
}

#[test]
fn utf16_without_bom_is_not_detected() {
    // "1" as BOM-less UTF-16 BE decodes as UTF-8: a NUL then a digit.
    let (_, err) = events(b"\x00\x31");
    assert_eq!(err, Some(Error::ExpectedToken));
}

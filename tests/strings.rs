//! The string lexer: escapes, surrogate pairs, extension escapes, and the
//! length limit.

mod recorder;

use peejay::{Backend, Error, Extensions, Parser, ParserOptions, Policies};
use recorder::{events, events_with_extensions, Event, Recorder};
use test_log::test;

fn string_events(input: &[u8]) -> (Vec<Event>, Option<Error>) {
    events(input)
}

#[test]
fn simple_strings() {
    for (text, expected) in [
        (r#""""#, ""),
        (r#""hi""#, "hi"),
        (r#""hello world""#, "hello world"),
        (r#""é𝄞中""#, "é𝄞中"),
    ] {
        let (ev, err) = string_events(text.as_bytes());
        assert_eq!(err, None, "{text}");
        assert_eq!(ev, vec![Event::String(expected.to_owned())], "{text}");
    }
}

#[test]
fn standard_escapes() {
    let (ev, err) = string_events(br#""\" \\ \/ \b \f \n \r \t""#);
    assert_eq!(err, None);
    assert_eq!(
        ev,
        vec![Event::String("\" \\ / \x08 \x0C \n \r \t".to_owned())]
    );
}

#[test]
fn unicode_escapes() {
    for (text, expected) in [
        (r#""\u0041""#, "A"),
        (r#""\u00E9""#, "\u{E9}"),
        (r#""\u20AC""#, "\u{20AC}"),
        (r#""\uFFFD""#, "\u{FFFD}"),
        (r#""\u0061\u0062\u0063""#, "abc"),
    ] {
        let (ev, err) = string_events(text.as_bytes());
        assert_eq!(err, None, "{text}");
        assert_eq!(ev, vec![Event::String(expected.to_owned())], "{text}");
    }
}

/// A UTF-16 surrogate pair written as two \u escapes reconstructs the
/// supplementary-plane code point (U+1D11E, four UTF-8 bytes).
#[test]
fn surrogate_pair() {
    let (ev, err) = string_events(br#""\uD834\uDD1E""#);
    assert_eq!(err, None);
    assert_eq!(ev, vec![Event::String("\u{1D11E}".to_owned())]);
    assert_eq!("\u{1D11E}".as_bytes(), [0xF0, 0x9D, 0x84, 0x9E]);
}

#[test]
fn lone_surrogates_are_rejected() {
    for text in [
        r#""\uD834""#,       // high with nothing after it
        r#""\uDD1E""#,       // low with no high
        r#""\uD834x""#,      // high followed by a plain character
        r#""\uD834\u0041""#, // high followed by a BMP escape
        r#""\uD834\uD834""#, // high followed by another high
    ] {
        let (_, err) = string_events(text.as_bytes());
        assert_eq!(err, Some(Error::BadUnicodeCodePoint), "{text}");
    }
}

#[test]
fn control_characters_must_be_escaped() {
    for text in ["\"\t\"", "\"\n\"", "\"\x01\"", "\"\x1F\""] {
        let (_, err) = string_events(text.as_bytes());
        assert_eq!(err, Some(Error::BadUnicodeCodePoint), "{text}");
    }
}

#[test]
fn unterminated_string() {
    for text in [r#""abc"#, r#"""#, r#""\"#, r#""\u12"#] {
        let (_, err) = string_events(text.as_bytes());
        assert_eq!(err, Some(Error::ExpectedCloseQuote), "{text}");
    }
}

#[test]
fn invalid_escapes() {
    for text in [r#""\q""#, r#""\U0041""#, r#""\8""#] {
        let (_, err) = string_events(text.as_bytes());
        assert_eq!(err, Some(Error::InvalidEscapeChar), "{text}");
    }
    // \x, \0, \v, \' and escaped line endings need the string_escapes
    // extension.
    for text in [r#""\x41""#, r#""\0""#, r#""\v""#, r#""\'""#, "\"a\\\nb\""] {
        let (_, err) = string_events(text.as_bytes());
        assert_eq!(err, Some(Error::InvalidEscapeChar), "{text}");
    }
}

#[test]
fn invalid_hex_digit() {
    let (_, err) = string_events(br#""\u12G4""#);
    assert_eq!(err, Some(Error::InvalidHexChar));
}

#[test]
fn strings_in_structures() {
    let (ev, err) = events(br#"["a", "b"]"#);
    assert_eq!(err, None);
    assert_eq!(
        ev,
        vec![
            Event::BeginArray,
            Event::String("a".to_owned()),
            Event::String("b".to_owned()),
            Event::EndArray,
        ]
    );
}

mod extension_escapes {
    use super::*;
    use test_log::test;

    fn relaxed(input: &[u8]) -> (Vec<Event>, Option<Error>) {
        events_with_extensions(input, Extensions::STRING_ESCAPES)
    }

    #[test]
    fn extra_escapes() {
        let (ev, err) = relaxed(br#""\0\v\'""#);
        assert_eq!(err, None);
        assert_eq!(ev, vec![Event::String("\0\x0B'".to_owned())]);
    }

    #[test]
    fn hex_byte_escape() {
        let (ev, err) = relaxed(br#""\x41\x42""#);
        assert_eq!(err, None);
        assert_eq!(ev, vec![Event::String("AB".to_owned())]);
    }

    /// A \x escape writes a raw byte; two of them can spell a multi-byte
    /// UTF-8 character.
    #[test]
    fn hex_byte_escape_utf8_sequence() {
        let (ev, err) = relaxed(br#""\xC3\xA9""#);
        assert_eq!(err, None);
        assert_eq!(ev, vec![Event::String("é".to_owned())]);
    }

    /// A \x escape that leaves the buffer ill-formed is rejected when the
    /// string completes.
    #[test]
    fn hex_byte_escape_must_form_utf8() {
        let (_, err) = relaxed(br#""\x80""#);
        assert_eq!(err, Some(Error::BadUnicodeCodePoint));
        let (_, err) = relaxed(br#""\xC3x""#);
        assert_eq!(err, Some(Error::BadUnicodeCodePoint));
    }

    #[test]
    fn line_continuations() {
        let (ev, err) = relaxed(b"\"ab\\\ncd\"");
        assert_eq!(err, None);
        assert_eq!(ev, vec![Event::String("abcd".to_owned())]);

        // A continuation written as CR LF is skipped as a pair.
        let (ev, err) = relaxed(b"\"ab\\\r\ncd\"");
        assert_eq!(err, None);
        assert_eq!(ev, vec![Event::String("abcd".to_owned())]);

        // CR alone also continues.
        let (ev, err) = relaxed(b"\"ab\\\rcd\"");
        assert_eq!(err, None);
        assert_eq!(ev, vec![Event::String("abcd".to_owned())]);

        // So do LS and PS.
        let (ev, err) = relaxed("\"ab\\\u{2028}cd\"".as_bytes());
        assert_eq!(err, None);
        assert_eq!(ev, vec![Event::String("abcd".to_owned())]);
    }
}

mod single_quotes {
    use super::*;
    use test_log::test;

    #[test]
    fn single_quoted_string() {
        let (ev, err) = events_with_extensions(b"'hi'", Extensions::SINGLE_QUOTE_STRING);
        assert_eq!(err, None);
        assert_eq!(ev, vec![Event::String("hi".to_owned())]);
    }

    #[test]
    fn needs_the_extension() {
        let (ev, err) = events(b"'hi'");
        assert_eq!(ev, vec![]);
        assert_eq!(err, Some(Error::ExpectedToken));
    }

    #[test]
    fn double_quotes_inside_single() {
        let (ev, err) = events_with_extensions(br#"'say "hi"'"#, Extensions::SINGLE_QUOTE_STRING);
        assert_eq!(err, None);
        assert_eq!(ev, vec![Event::String(r#"say "hi""#.to_owned())]);
    }

    #[test]
    fn must_close_with_the_opening_quote() {
        let (_, err) = events_with_extensions(b"'hi\"", Extensions::SINGLE_QUOTE_STRING);
        assert_eq!(err, Some(Error::ExpectedCloseQuote));
    }
}

mod length_limit {
    use super::*;
    use test_log::test;

    struct Tiny;

    impl Policies for Tiny {
        const MAX_LENGTH: usize = 8;
        type Integer = i64;
    }

    fn tiny_parse(input: &[u8], extensions: Extensions) -> Option<Error> {
        let mut parser = Parser::<_, Tiny>::with_policies(
            Recorder::default(),
            peejay::ParserOptionsBuilder::default()
                .with_extensions(extensions)
                .build(),
        );
        parser.input(input).eof();
        parser.last_error()
    }

    #[test]
    fn at_the_limit() {
        assert_eq!(tiny_parse(br#""12345678""#, Extensions::NONE), None);
    }

    #[test]
    fn over_the_limit() {
        assert_eq!(
            tiny_parse(br#""123456789""#, Extensions::NONE),
            Some(Error::StringTooLong)
        );
    }

    /// The limit counts UTF-8 bytes, not characters.
    #[test]
    fn multi_byte_characters_count_their_bytes() {
        // Three three-byte characters fit; a fourth does not.
        assert_eq!(tiny_parse("\"中中\"".as_bytes(), Extensions::NONE), None);
        assert_eq!(
            tiny_parse("\"中中中\"".as_bytes(), Extensions::NONE),
            Some(Error::StringTooLong)
        );
    }

    #[test]
    fn escapes_count_too() {
        assert_eq!(
            tiny_parse(br#""1234567\u0041\u0042""#, Extensions::NONE),
            Some(Error::StringTooLong)
        );
    }
}

/// The string buffer is reused between strings; earlier contents never
/// leak into later ones.
#[test]
fn buffer_reuse() {
    let (ev, err) = events(br#"["long first string", "x", ""]"#);
    assert_eq!(err, None);
    assert_eq!(
        ev,
        vec![
            Event::BeginArray,
            Event::String("long first string".to_owned()),
            Event::String("x".to_owned()),
            Event::String(String::new()),
            Event::EndArray,
        ]
    );
}

/// The &str passed to a callback borrows the parser's buffer only for the
/// duration of the call; a backend that wants it must copy, which is what
/// the recorder does.
#[test]
fn views_are_copied_per_callback() {
    struct Lengths(Vec<usize>);

    impl Backend for Lengths {
        type Output = Vec<usize>;

        fn string_value(&mut self, value: &str) -> Result<(), Error> {
            self.0.push(value.len());
            Ok(())
        }

        fn result(&mut self) -> Vec<usize> {
            std::mem::take(&mut self.0)
        }
    }

    let mut parser = Parser::new_with_options(Lengths(vec![]), ParserOptions::default());
    let lengths = parser.input(br#"["abc", "de", "fghij"]"#).eof();
    assert_eq!(lengths, vec![3, 2, 5]);
}

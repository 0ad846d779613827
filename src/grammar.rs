//! Classification of code points according to the grammar rules they can
//! participate in: whitespace, identifier-start, and identifier-part.
//!
//! ASCII, by far the most common case, is answered directly; everything
//! else is resolved by binary search over the sorted run table in
//! [`cprun`](crate::cprun).

use crate::cprun::{run_first, run_length, run_rule, CODE_POINT_RUNS};

/// The role a code point can play in the grammar.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum GrammarRule {
    Whitespace = 0,
    IdentifierStart = 1,
    IdentifierPart = 2,
}

/// Look up the grammar rule for an arbitrary code point. Returns `None` for
/// code points with no rule.
pub(crate) fn code_point_rule(c: char) -> Option<GrammarRule> {
    let cp = c as u32;
    let idx = CODE_POINT_RUNS.partition_point(|&r| run_first(r) + run_length(r) <= cp);
    let &r = CODE_POINT_RUNS.get(idx)?;
    if cp >= run_first(r) && cp < run_first(r) + run_length(r) {
        Some(run_rule(r))
    } else {
        None
    }
}

/// True if `c` counts as whitespace. The ASCII whitespace characters plus
/// NO-BREAK SPACE are answered without consulting the table.
pub(crate) fn is_whitespace(c: char) -> bool {
    match c {
        ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r' | '\u{A0}' => true,
        _ => c > '\u{FF}' && code_point_rule(c) == Some(GrammarRule::Whitespace),
    }
}

/// True if `c` can begin an ECMAScript IdentifierName.
pub(crate) fn is_identifier_start(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphabetic() || c == '$' || c == '_';
    }
    // U+0080 is where the Latin-1 supplement starts. Consult the table for
    // code points beyond this.
    code_point_rule(c) == Some(GrammarRule::IdentifierStart)
}

/// True if `c` can continue an ECMAScript IdentifierName. Every
/// identifier-start code point is also an identifier-part.
pub(crate) fn is_identifier_part(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_digit() || is_identifier_start(c);
    }
    matches!(
        code_point_rule(c),
        Some(GrammarRule::IdentifierStart) | Some(GrammarRule::IdentifierPart)
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ascii_whitespace() {
        for c in [' ', '\t', '\n', '\r', '\x0B', '\x0C', '\u{A0}'] {
            assert!(is_whitespace(c), "{c:?}");
        }
        assert!(!is_whitespace('x'));
        assert!(!is_whitespace('0'));
    }

    #[test]
    fn unicode_whitespace() {
        // OGHAM SPACE MARK, EN QUAD, IDEOGRAPHIC SPACE, LINE SEPARATOR,
        // PARAGRAPH SEPARATOR.
        for c in ['\u{1680}', '\u{2000}', '\u{3000}', '\u{2028}', '\u{2029}'] {
            assert!(is_whitespace(c), "{c:?}");
        }
        assert!(!is_whitespace('\u{2030}'));
    }

    #[test]
    fn ascii_identifiers() {
        assert!(is_identifier_start('a'));
        assert!(is_identifier_start('Z'));
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('_'));
        assert!(!is_identifier_start('1'));
        assert!(!is_identifier_start('-'));

        assert!(is_identifier_part('1'));
        assert!(is_identifier_part('a'));
        assert!(!is_identifier_part('-'));
        assert!(!is_identifier_part(' '));
    }

    #[test]
    fn unicode_identifiers() {
        // Greek, Cyrillic, Hiragana, CJK.
        for c in ['\u{3B1}', '\u{416}', '\u{3042}', '\u{4E2D}'] {
            assert!(is_identifier_start(c), "{c:?}");
            assert!(is_identifier_part(c), "{c:?}");
        }
        // COMBINING GRAVE ACCENT continues but cannot start an identifier.
        assert!(!is_identifier_start('\u{300}'));
        assert!(is_identifier_part('\u{300}'));
        // Zero-width joiners continue identifiers.
        assert!(is_identifier_part('\u{200D}'));
        // Replacement character plays no part in the grammar.
        assert!(!is_identifier_start('\u{FFFD}'));
        assert!(!is_identifier_part('\u{FFFD}'));
        assert!(!is_whitespace('\u{FFFD}'));
    }

    #[test]
    fn rule_lookup_misses() {
        assert_eq!(code_point_rule('\u{0}'), None);
        assert_eq!(code_point_rule('\u{10FFFF}'), None);
    }
}

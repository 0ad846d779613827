use super::{consumed, retry, HexEscape, HexOutput, Step};
use crate::backend::Backend;
use crate::error::Error;
use crate::extensions::Extensions;
use crate::parser::Context;
use crate::policies::Policies;

/// Matches a string.
///
/// The scanned contents are assembled as UTF-8 into the parser's shared
/// string buffer and handed to the backend when the closing quote is seen.
pub(crate) struct StringMatcher {
    state: State,
    /// True when the string sits in an object's key position and must be
    /// reported through `key` rather than `string_value`.
    is_object_key: bool,
    /// The quote character that opened (and must close) the string. An
    /// apostrophe only appears here under the single_quote_string
    /// extension.
    enclosing: char,
    hex: HexEscape,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Start,
    Normal,
    Escape,
    Hex1,
    Hex2,
    Hex3,
    Hex4,
    /// A backslash followed by a carriage return: silently consume a
    /// subsequent line feed.
    SkipLf,
    Done,
}

impl StringMatcher {
    pub(crate) fn new(is_object_key: bool, enclosing: char) -> Self {
        StringMatcher {
            state: State::Start,
            is_object_key,
            enclosing,
            hex: HexEscape::default(),
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.state == State::Done
    }

    pub(crate) fn consume<B: Backend, P: Policies>(
        &mut self,
        ctx: &mut Context<B, P>,
        ch: Option<char>,
    ) -> Step {
        let Some(c) = ch else {
            self.fail(ctx, Error::ExpectedCloseQuote);
            return consumed();
        };
        match self.state {
            State::Start => {
                ctx.buffer.clear();
                if c == self.enclosing {
                    self.state = State::Normal;
                } else {
                    self.fail(ctx, Error::ExpectedToken);
                }
                consumed()
            }
            State::Normal => {
                self.normal(ctx, c);
                consumed()
            }
            State::Escape => {
                self.escape(ctx, c);
                consumed()
            }
            State::Hex1 | State::Hex2 | State::Hex3 => {
                match self.hex.digit(c) {
                    Ok(()) => self.state = self.next_hex_state(),
                    Err(err) => self.fail(ctx, err),
                }
                consumed()
            }
            State::Hex4 => {
                match self.hex.finish(c) {
                    Ok(HexOutput::Nothing) => self.state = State::Normal,
                    Ok(HexOutput::CodePoint(cp)) => {
                        if ctx.append_code_point(cp) {
                            self.state = State::Normal;
                        } else {
                            self.fail(ctx, Error::StringTooLong);
                        }
                    }
                    Ok(HexOutput::Byte(b)) => {
                        if ctx.append_byte(b) {
                            self.state = State::Normal;
                        } else {
                            self.fail(ctx, Error::StringTooLong);
                        }
                    }
                    Err(err) => self.fail(ctx, err),
                }
                consumed()
            }
            State::SkipLf => {
                self.state = State::Normal;
                if c == '\n' {
                    consumed()
                } else {
                    retry()
                }
            }
            State::Done => consumed(),
        }
    }

    fn next_hex_state(&self) -> State {
        match self.state {
            State::Hex1 => State::Hex2,
            State::Hex2 => State::Hex3,
            _ => State::Hex4,
        }
    }

    /// A character outside any escape or hex sequence.
    fn normal<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, c: char) {
        if c == '\\' {
            self.state = State::Escape;
            return;
        }
        // Part of a UTF-16 surrogate pair was seen; the rest must be
        // written with another \u escape.
        if self.hex.partial() {
            self.fail(ctx, Error::BadUnicodeCodePoint);
            return;
        }
        if c == self.enclosing {
            // The closing quote: hand the buffer to the backend.
            match ctx.emit_string(self.is_object_key) {
                Ok(()) => self.state = State::Done,
                Err(err) => self.fail(ctx, err),
            }
            return;
        }
        if c <= '\x1F' {
            // Control characters U+0000 through U+001F must be escaped.
            self.fail(ctx, Error::BadUnicodeCodePoint);
            return;
        }
        if !ctx.append_code_point(c) {
            self.fail(ctx, Error::StringTooLong);
        }
    }

    /// The character following a backslash.
    fn escape<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, c: char) {
        let literal = match c {
            '"' | '\\' | '/' => c,
            'b' => '\x08',
            'f' => '\x0C',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => {
                self.hex.start(true);
                self.state = State::Hex1;
                return;
            }
            'x' if ctx.extension(Extensions::STRING_ESCAPES) => {
                self.hex.start(false);
                self.state = State::Hex3;
                return;
            }
            '\'' if ctx.extension(Extensions::STRING_ESCAPES) => '\'',
            '0' if ctx.extension(Extensions::STRING_ESCAPES) => '\0',
            'v' if ctx.extension(Extensions::STRING_ESCAPES) => '\x0B',
            '\n' | '\r' | '\u{2028}' | '\u{2029}' if ctx.extension(Extensions::STRING_ESCAPES) => {
                // An escaped line ending continues the string on the next
                // line; the characters are discarded. A carriage return may
                // be followed by a line feed which is skipped too.
                self.state = if c == '\r' { State::SkipLf } else { State::Normal };
                return;
            }
            _ => {
                self.fail(ctx, Error::InvalidEscapeChar);
                return;
            }
        };
        if ctx.append_code_point(literal) {
            self.state = State::Normal;
        } else {
            self.fail(ctx, Error::StringTooLong);
        }
    }

    fn fail<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, err: Error) {
        ctx.record_error(err);
        self.state = State::Done;
    }
}

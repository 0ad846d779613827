use super::{consumed, retry, want_code_point, HexEscape, HexOutput, Matcher, Step};
use crate::backend::Backend;
use crate::error::Error;
use crate::grammar;
use crate::parser::Context;
use crate::policies::Policies;

/// Matches an ECMAScript IdentifierName in an object's key position. Only
/// reachable with the identifier_object_key extension enabled.
pub(crate) struct IdentifierMatcher {
    state: State,
    hex: HexEscape,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    /// Implements the IdentifierStart rule.
    Start,
    /// Implements the IdentifierPart rule.
    Part,
    /// A backslash was seen; `u` must follow.
    U,
    Hex1,
    Hex2,
    Hex3,
    Hex4,
    Done,
}

impl IdentifierMatcher {
    pub(crate) fn new() -> Self {
        IdentifierMatcher {
            state: State::Start,
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
                if want_code_point(ctx, c) {
                    return (Some(Matcher::whitespace()), false);
                }
                if c == '\\' {
                    self.state = State::U;
                    return consumed();
                }
                if !grammar::is_identifier_start(c) {
                    self.fail(ctx, Error::BadIdentifier);
                    return consumed();
                }
                self.state = State::Part;
                self.append(ctx, c);
                consumed()
            }
            State::Part => {
                if c == '\\' {
                    self.state = State::U;
                    return consumed();
                }
                // Part of a UTF-16 surrogate pair was seen; the rest must
                // be written with another \u escape.
                if self.hex.partial() {
                    self.fail(ctx, Error::BadUnicodeCodePoint);
                    return consumed();
                }
                if !grammar::is_identifier_part(c) {
                    // This code point is not part of the identifier: the
                    // key is complete. Don't consume the code point.
                    match ctx.emit_string(true) {
                        Ok(()) => self.state = State::Done,
                        Err(err) => self.fail(ctx, err),
                    }
                    return retry();
                }
                self.append(ctx, c);
                consumed()
            }
            State::U => {
                if c != 'u' {
                    self.fail(ctx, Error::ExpectedToken);
                    return consumed();
                }
                self.hex.start(true);
                self.state = State::Hex1;
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
                    Ok(HexOutput::Nothing) => self.state = State::Part,
                    Ok(HexOutput::CodePoint(cp)) => {
                        self.state = State::Part;
                        self.append(ctx, cp);
                    }
                    Ok(HexOutput::Byte(_)) => {
                        unreachable!("identifiers have no two-digit hex escape")
                    }
                    Err(err) => self.fail(ctx, err),
                }
                consumed()
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

    fn append<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, c: char) {
        if !ctx.append_code_point(c) {
            self.fail(ctx, Error::IdentifierTooLong);
        }
    }

    fn fail<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, err: Error) {
        ctx.record_error(err);
        self.state = State::Done;
    }
}

use super::{consumed, retry, Step};
use crate::backend::Backend;
use crate::error::Error;
use crate::grammar;
use crate::parser::Context;
use crate::policies::Policies;

/// The literals the keyword matcher can recognize. `Infinity` and `NaN`
/// only reach the matcher when the numbers extension is enabled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Keyword {
    True,
    False,
    Null,
    Infinity,
    Nan,
}

impl Keyword {
    fn text(self) -> &'static str {
        match self {
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::Infinity => "Infinity",
            Keyword::Nan => "NaN",
        }
    }

    /// Fire the backend event for a completely matched keyword.
    fn complete<B: Backend, P: Policies>(self, ctx: &mut Context<B, P>) -> Result<(), Error> {
        match self {
            Keyword::True => ctx.backend.boolean_value(true),
            Keyword::False => ctx.backend.boolean_value(false),
            Keyword::Null => ctx.backend.null_value(),
            Keyword::Infinity => ctx.backend.double_value(f64::INFINITY),
            Keyword::Nan => ctx.backend.double_value(f64::NAN),
        }
    }
}

/// The outcome of matching one code point against a literal's text.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TokenMatch {
    More,
    Match,
    Fail,
}

/// Consumes a fixed literal one code point at a time. Shared with the
/// number matcher, which uses it for the tails of `Infinity` and `NaN`.
#[derive(Default)]
pub(crate) struct TokenText {
    remaining: &'static str,
}

impl TokenText {
    pub(crate) fn new(text: &'static str) -> Self {
        TokenText { remaining: text }
    }

    pub(crate) fn advance(&mut self, c: char) -> TokenMatch {
        let mut chars = self.remaining.chars();
        if chars.next() != Some(c) {
            return TokenMatch::Fail;
        }
        self.remaining = chars.as_str();
        if self.remaining.is_empty() {
            TokenMatch::Match
        } else {
            TokenMatch::More
        }
    }
}

/// A matcher which checks for a specific keyword such as `true`, `false`,
/// or `null`. The input must match the entire literal and must not be
/// immediately followed by an identifier-part code point (so `trueX` is an
/// error rather than the keyword `true`).
pub(crate) struct TokenMatcher {
    state: State,
    text: TokenText,
    keyword: Keyword,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Start,
    Last,
    Done,
}

impl TokenMatcher {
    pub(crate) fn new(keyword: Keyword) -> Self {
        TokenMatcher {
            state: State::Start,
            text: TokenText::new(keyword.text()),
            keyword,
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
        match self.state {
            State::Start => {
                let Some(c) = ch else {
                    self.fail(ctx, Error::UnrecognizedToken);
                    return consumed();
                };
                match self.text.advance(c) {
                    TokenMatch::Fail => self.fail(ctx, Error::UnrecognizedToken),
                    TokenMatch::Match => self.state = State::Last,
                    TokenMatch::More => {}
                }
                consumed()
            }
            State::Last => {
                if let Some(c) = ch {
                    if grammar::is_identifier_part(c) {
                        self.fail(ctx, Error::UnrecognizedToken);
                        return consumed();
                    }
                }
                self.state = State::Done;
                if let Err(err) = self.keyword.complete(ctx) {
                    ctx.record_error(err);
                }
                if ch.is_some() {
                    retry()
                } else {
                    consumed()
                }
            }
            State::Done => consumed(),
        }
    }

    fn fail<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, err: Error) {
        ctx.record_error(err);
        self.state = State::Done;
    }
}

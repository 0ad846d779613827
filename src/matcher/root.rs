use super::{consumed, want_code_point, Keyword, Matcher, Step};
use crate::backend::Backend;
use crate::error::Error;
use crate::extensions::Extensions;
use crate::parser::Context;
use crate::policies::Policies;

/// Inspects the first code point of a value and pushes the matcher for the
/// production it introduces. The pushed matcher sees the same code point
/// again and performs the actual parsing.
pub(crate) struct RootMatcher {
    state: State,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Start,
    NewToken,
    Done,
}

impl RootMatcher {
    pub(crate) fn new() -> Self {
        RootMatcher {
            state: State::Start,
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
            self.fail(ctx, Error::ExpectedToken);
            return consumed();
        };
        if self.state == State::Start {
            self.state = State::NewToken;
            if want_code_point(ctx, c) {
                return (Some(Matcher::whitespace()), false);
            }
        }
        debug_assert!(self.state == State::NewToken);
        self.state = State::Done;
        match c {
            '+' if !ctx.extension(Extensions::LEADING_PLUS) => self.expected_token(ctx),
            '.' if !ctx.extension(Extensions::NUMBERS) => self.expected_token(ctx),
            '+' | '-' | '.' | '0'..='9' => (Some(Matcher::number()), false),
            '\'' if !ctx.extension(Extensions::SINGLE_QUOTE_STRING) => self.expected_token(ctx),
            '"' | '\'' => (Some(Matcher::string(false, c)), false),
            'I' if ctx.extension(Extensions::NUMBERS) => {
                (Some(Matcher::keyword(Keyword::Infinity)), false)
            }
            'N' if ctx.extension(Extensions::NUMBERS) => {
                (Some(Matcher::keyword(Keyword::Nan)), false)
            }
            't' => (Some(Matcher::keyword(Keyword::True)), false),
            'f' => (Some(Matcher::keyword(Keyword::False)), false),
            'n' => (Some(Matcher::keyword(Keyword::Null)), false),
            '[' => (Some(Matcher::array()), false),
            '{' => (Some(Matcher::object()), false),
            _ => self.expected_token(ctx),
        }
    }

    fn expected_token<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>) -> Step {
        self.fail(ctx, Error::ExpectedToken);
        consumed()
    }

    fn fail<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, err: Error) {
        ctx.record_error(err);
        self.state = State::Done;
    }
}

use super::{consumed, want_code_point, Matcher, Step};
use crate::backend::Backend;
use crate::error::Error;
use crate::extensions::Extensions;
use crate::parser::Context;
use crate::policies::Policies;

/// Matches an object.
pub(crate) struct ObjectMatcher {
    state: State,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Start,
    FirstKey,
    Key,
    Colon,
    Value,
    Comma,
    Done,
}

impl ObjectMatcher {
    pub(crate) fn new() -> Self {
        ObjectMatcher {
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
            self.fail(ctx, Error::ExpectedObjectMember);
            return consumed();
        };
        match self.state {
            State::Start => {
                debug_assert!(c == '{');
                self.state = State::FirstKey;
                if let Err(err) = ctx.backend.begin_object() {
                    self.fail(ctx, err);
                    return consumed();
                }
                (Some(Matcher::whitespace()), true)
            }
            // Either a closing brace (ending the object) or a key.
            State::FirstKey if c == '}' => {
                self.end_object(ctx);
                consumed()
            }
            State::FirstKey | State::Key => self.key(ctx, c),
            State::Colon => {
                if want_code_point(ctx, c) {
                    // Just consume whitespace before the colon.
                    return (Some(Matcher::whitespace()), false);
                }
                if c == ':' {
                    self.state = State::Value;
                } else {
                    self.fail(ctx, Error::ExpectedColon);
                }
                consumed()
            }
            State::Value => {
                self.state = State::Comma;
                (Some(Matcher::root()), false)
            }
            State::Comma => self.comma(ctx, c),
            State::Done => consumed(),
        }
    }

    /// Match a property name, then expect a colon.
    fn key<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, c: char) -> Step {
        self.state = State::Colon;
        if c == '"' || (c == '\'' && ctx.extension(Extensions::SINGLE_QUOTE_STRING)) {
            return (Some(Matcher::string(true, c)), false);
        }
        if ctx.extension(Extensions::IDENTIFIER_OBJECT_KEY) {
            return (Some(Matcher::identifier()), false);
        }
        self.fail(ctx, Error::ExpectedObjectKey);
        consumed()
    }

    fn comma<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, c: char) -> Step {
        if want_code_point(ctx, c) {
            // Just consume whitespace before the comma.
            return (Some(Matcher::whitespace()), false);
        }
        match c {
            ',' => {
                // Strict JSON requires a property name after a comma; the
                // trailing-comma extension also allows the closing brace.
                self.state = if ctx.extension(Extensions::OBJECT_TRAILING_COMMA) {
                    State::FirstKey
                } else {
                    State::Key
                };
                // Consume the comma and any whitespace before the property
                // name or closing brace.
                (Some(Matcher::whitespace()), true)
            }
            '}' => {
                self.end_object(ctx);
                consumed()
            }
            _ => {
                self.fail(ctx, Error::ExpectedObjectMember);
                consumed()
            }
        }
    }

    fn end_object<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>) {
        if let Err(err) = ctx.backend.end_object() {
            ctx.record_error(err);
        }
        self.state = State::Done;
    }

    fn fail<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, err: Error) {
        ctx.record_error(err);
        self.state = State::Done;
    }
}

use super::{consumed, want_code_point, Matcher, Step};
use crate::backend::Backend;
use crate::error::Error;
use crate::extensions::Extensions;
use crate::parser::Context;
use crate::policies::Policies;

/// Matches an array.
pub(crate) struct ArrayMatcher {
    state: State,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Start,
    FirstElement,
    Element,
    Comma,
    Done,
}

impl ArrayMatcher {
    pub(crate) fn new() -> Self {
        ArrayMatcher {
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
            self.fail(ctx, Error::ExpectedArrayMember);
            return consumed();
        };
        match self.state {
            State::Start => {
                debug_assert!(c == '[');
                if let Err(err) = ctx.backend.begin_array() {
                    self.fail(ctx, err);
                    return consumed();
                }
                self.state = State::FirstElement;
                // Consume the bracket and any whitespace before the first
                // element (or the closing bracket).
                (Some(Matcher::whitespace()), true)
            }
            State::FirstElement if c == ']' => {
                self.end_array(ctx);
                consumed()
            }
            State::FirstElement | State::Element => {
                self.state = State::Comma;
                (Some(Matcher::root()), false)
            }
            State::Comma => {
                if want_code_point(ctx, c) {
                    // Just consume whitespace before the comma.
                    return (Some(Matcher::whitespace()), false);
                }
                match c {
                    ',' => {
                        // With the trailing-comma extension a closing
                        // bracket may follow the comma.
                        self.state = if ctx.extension(Extensions::ARRAY_TRAILING_COMMA) {
                            State::FirstElement
                        } else {
                            State::Element
                        };
                        (Some(Matcher::whitespace()), true)
                    }
                    ']' => {
                        self.end_array(ctx);
                        consumed()
                    }
                    _ => {
                        self.fail(ctx, Error::ExpectedArrayMember);
                        consumed()
                    }
                }
            }
            State::Done => consumed(),
        }
    }

    fn end_array<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>) {
        if let Err(err) = ctx.backend.end_array() {
            ctx.record_error(err);
        }
        self.state = State::Done;
    }

    fn fail<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, err: Error) {
        ctx.record_error(err);
        self.state = State::Done;
    }
}

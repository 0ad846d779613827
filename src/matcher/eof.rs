use super::{consumed, Step};
use crate::backend::Backend;
use crate::error::Error;
use crate::parser::Context;
use crate::policies::Policies;

/// Lives at the bottom of the parse stack to ensure that the input ends
/// after a single top-level value.
pub(crate) struct EofMatcher {
    state: State,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Start,
    Done,
}

impl EofMatcher {
    pub(crate) fn new() -> Self {
        EofMatcher {
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
        if ch.is_some() {
            ctx.record_error(Error::UnexpectedExtraInput);
        }
        self.state = State::Done;
        consumed()
    }
}

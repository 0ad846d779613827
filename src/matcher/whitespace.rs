use super::{consumed, retry, Step};
use crate::backend::Backend;
use crate::error::Error;
use crate::extensions::Extensions;
use crate::grammar::{self, GrammarRule};
use crate::parser::Context;
use crate::policies::Policies;

/// Consumes whitespace between tokens and updates the row number in
/// response to the various combinations of CR and LF. With the relevant
/// extensions enabled it also swallows `#`, `//`, and `/* */` comments,
/// which count as whitespace from the grammar's point of view.
pub(crate) struct WhitespaceMatcher {
    state: State,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    /// Normal whitespace scanning.
    Body,
    /// Handles the LF part of a Windows-style CR/LF pair.
    Crlf,
    /// Consumes the contents of a `#` or `//` comment.
    SingleLineComment,
    /// A `/` has been seen; the next character decides the comment kind.
    CommentStart,
    /// Consumes the contents of a multi-line comment.
    MultiLineBody,
    /// Entered when checking for the second character of the `*/` pair.
    MultiLineEnding,
    /// Handles the LF part of a CR/LF pair inside a multi-line comment.
    MultiLineCrlf,
    Done,
}

/// Returns true if `code_point` begins a whitespace sequence that a
/// whitespace matcher will consume under the enabled extensions. Composite
/// matchers use this to decide whether to push a whitespace matcher before
/// inspecting the code point themselves; claiming a code point the matcher
/// would then refuse would re-offer it to the caller forever.
pub(crate) fn want_code_point<B: Backend, P: Policies>(
    ctx: &Context<B, P>,
    code_point: char,
) -> bool {
    match code_point {
        // Not whitespace, but the potential start of a comment, which from
        // the caller's point of view amounts to the same thing.
        '#' => ctx.extension(Extensions::BASH_COMMENTS),
        '/' => ctx.extension(Extensions::SINGLE_LINE_COMMENTS | Extensions::MULTI_LINE_COMMENTS),
        ' ' | '\t' | '\r' | '\n' => true,
        '\x0B' | '\x0C' | '\u{A0}' => ctx.extension(Extensions::EXTRA_WHITESPACE),
        _ => {
            // The cases above cover everything below U+0100; for the rest,
            // consult the table.
            ctx.extension(Extensions::EXTRA_WHITESPACE)
                && code_point > '\u{FF}'
                && grammar::code_point_rule(code_point) == Some(GrammarRule::Whitespace)
        }
    }
}

impl WhitespaceMatcher {
    pub(crate) fn new() -> Self {
        WhitespaceMatcher { state: State::Body }
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
            match self.state {
                State::MultiLineBody | State::MultiLineEnding | State::MultiLineCrlf => {
                    self.fail(ctx, Error::UnterminatedMultilineComment);
                }
                _ => self.state = State::Done,
            }
            return consumed();
        };

        match self.state {
            State::Crlf => {
                self.state = State::Body;
                if c == '\n' {
                    ctx.reset_column();
                    consumed()
                } else {
                    self.body(ctx, c)
                }
            }
            State::Body => self.body(ctx, c),
            State::CommentStart => self.comment_start(ctx, c),
            State::SingleLineComment => {
                if c == '\r' || c == '\n' {
                    // The comment ends here. Back to normal whitespace
                    // handling, re-offering the line ending.
                    self.state = State::Body;
                    retry()
                } else {
                    consumed()
                }
            }
            State::MultiLineEnding => {
                match c {
                    // An asterisk followed by another asterisk: stay put.
                    '*' => {}
                    // `*/` ends the comment.
                    '/' => self.state = State::Body,
                    _ => self.state = State::MultiLineBody,
                }
                consumed()
            }
            State::MultiLineCrlf => {
                self.state = State::MultiLineBody;
                if c == '\n' {
                    ctx.reset_column();
                    consumed()
                } else {
                    self.multi_line_body(ctx, c)
                }
            }
            State::MultiLineBody => self.multi_line_body(ctx, c),
            State::Done => consumed(),
        }
    }

    fn body<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, c: char) -> Step {
        match c {
            ' ' | '\t' => consumed(),
            '\r' => {
                ctx.advance_row();
                self.state = State::Crlf;
                consumed()
            }
            '\n' => {
                ctx.advance_row();
                consumed()
            }
            '#' => {
                if !ctx.extension(Extensions::BASH_COMMENTS) {
                    return self.stop_retry();
                }
                self.state = State::SingleLineComment;
                consumed()
            }
            '/' => {
                if !ctx
                    .extension(Extensions::SINGLE_LINE_COMMENTS | Extensions::MULTI_LINE_COMMENTS)
                {
                    return self.stop_retry();
                }
                self.state = State::CommentStart;
                consumed()
            }
            _ => {
                if ctx.extension(Extensions::EXTRA_WHITESPACE) {
                    return self.extra(c);
                }
                self.stop_retry()
            }
        }
    }

    /// The whitespace accepted only under the extra_whitespace extension.
    fn extra(&mut self, c: char) -> Step {
        let is_ws = match c {
            '\x0B' | '\x0C' | '\u{A0}' => true,
            _ => c > '\u{FF}' && grammar::code_point_rule(c) == Some(GrammarRule::Whitespace),
        };
        if is_ws {
            consumed()
        } else {
            self.stop_retry()
        }
    }

    /// We've already seen an initial slash which could mean the start of a
    /// `//` comment, the start of a `/* */` comment, or a stray character.
    fn comment_start<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, c: char) -> Step {
        if c == '/' && ctx.extension(Extensions::SINGLE_LINE_COMMENTS) {
            self.state = State::SingleLineComment;
        } else if c == '*' && ctx.extension(Extensions::MULTI_LINE_COMMENTS) {
            self.state = State::MultiLineBody;
        } else {
            self.fail(ctx, Error::ExpectedToken);
        }
        consumed()
    }

    /// Like the body state except that commented characters are consumed as
    /// well as whitespace. We watch for the `*` that may end the comment.
    fn multi_line_body<B: Backend, P: Policies>(
        &mut self,
        ctx: &mut Context<B, P>,
        c: char,
    ) -> Step {
        match c {
            '*' => self.state = State::MultiLineEnding,
            '\r' => {
                ctx.advance_row();
                self.state = State::MultiLineCrlf;
            }
            '\n' => ctx.advance_row(),
            _ => {}
        }
        consumed()
    }

    /// Stop, let the driver pop this matcher, and re-offer the same code
    /// point to the caller.
    fn stop_retry(&mut self) -> Step {
        self.state = State::Done;
        retry()
    }

    fn fail<B: Backend, P: Policies>(&mut self, ctx: &mut Context<B, P>, err: Error) {
        ctx.record_error(err);
        self.state = State::Done;
    }
}

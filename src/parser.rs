use std::marker::PhantomData;
use std::str::from_utf8;

use crate::backend::Backend;
use crate::coord::Coord;
use crate::error::Error;
use crate::extensions::Extensions;
use crate::matcher::Matcher;
use crate::options::ParserOptions;
use crate::policies::{DefaultPolicies, Policies};
use crate::utf::ByteDecoder;

/// The state a matcher can reach from its consume() call: the shared string
/// buffer, the sticky error, the input position, the extension set, and the
/// backend. The matcher stack itself lives outside, in [`Parser`], so that
/// the top of the stack can be borrowed while the rest of the state is
/// mutated.
pub(crate) struct Context<B, P> {
    /// Strings, identifiers, and object keys are assembled into this one
    /// reusable UTF-8 buffer; it is cleared at the start of every new
    /// string. Backends that keep the contents must copy them during the
    /// callback.
    pub(crate) buffer: Vec<u8>,
    error: Option<Error>,
    /// The position of the next code point to be consumed.
    pub(crate) pos: Coord,
    extensions: Extensions,
    pub(crate) backend: B,
    _policies: PhantomData<P>,
}

impl<B, P> Context<B, P>
where
    B: Backend,
    P: Policies,
{
    /// True if any of the extensions in `flags` is enabled.
    pub(crate) fn extension(&self, flags: Extensions) -> bool {
        self.extensions.contains(flags)
    }

    pub(crate) fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Record an error for this parse. The first error is sticky: parsing
    /// stops, no further backend callback fires, and subsequent input is
    /// discarded.
    pub(crate) fn record_error(&mut self, err: Error) {
        if self.error.is_none() {
            log::debug!("parse error at {}: {err}", self.pos);
            self.error = Some(err);
        }
    }

    /// Increment the row number and reset the column.
    pub(crate) fn advance_row(&mut self) {
        self.pos.next_line();
        self.pos.reset_column();
    }

    /// Reset the column count without affecting the row number.
    pub(crate) fn reset_column(&mut self) {
        self.pos.reset_column();
    }

    /// Append a code point to the string buffer as UTF-8. Returns false if
    /// the buffer would exceed the policy length limit.
    pub(crate) fn append_code_point(&mut self, c: char) -> bool {
        let mut utf8 = [0u8; 4];
        let encoded = c.encode_utf8(&mut utf8);
        if self.buffer.len() + encoded.len() > P::MAX_LENGTH {
            return false;
        }
        self.buffer.extend_from_slice(encoded.as_bytes());
        true
    }

    /// Append one raw byte (the `\xXX` escape). Returns false if the buffer
    /// would exceed the policy length limit.
    pub(crate) fn append_byte(&mut self, b: u8) -> bool {
        if self.buffer.len() >= P::MAX_LENGTH {
            return false;
        }
        self.buffer.push(b);
        true
    }

    /// Hand the completed string buffer to the backend as an object key or
    /// a string value. The buffer is validated here so that the callback
    /// always receives well-formed UTF-8, whatever `\x` escapes wrote.
    pub(crate) fn emit_string(&mut self, is_object_key: bool) -> Result<(), Error> {
        let view = from_utf8(&self.buffer).map_err(|_| Error::BadUnicodeCodePoint)?;
        if is_object_key {
            self.backend.key(view)
        } else {
            self.backend.string_value(view)
        }
    }
}

/// A streaming, push-style JSON parser.
///
/// Feed input a chunk at a time with [`input`](Parser::input); the parser
/// decodes it, recognizes the grammar, and invokes the [`Backend`] callback
/// for everything it finds. Call [`eof`](Parser::eof) after the last chunk.
/// No tree is built; the backend decides what to materialize.
///
/// ```
/// use peejay::{Null, Parser};
///
/// let mut parser = Parser::new(Null);
/// parser.input(br#"{"numbers": [1, 2, 3]}"#).eof();
/// assert!(!parser.has_error());
/// ```
///
/// Chunk boundaries can fall anywhere, including inside a multi-byte
/// character or a keyword; the emitted events are identical to feeding the
/// whole document at once.
pub struct Parser<B, P = DefaultPolicies>
where
    B: Backend,
    P: Policies,
{
    decoder: ByteDecoder,
    /// The parse stack. The bottom two entries are permanent sentinels: an
    /// EOF matcher that rejects trailing input, and a whitespace matcher
    /// that absorbs whitespace after the top-level value.
    stack: Vec<Matcher>,
    max_depth: usize,
    /// Where the most recently pushed matcher started, which is where the
    /// current token began.
    matcher_pos: Coord,
    ctx: Context<B, P>,
}

impl<B> Parser<B>
where
    B: Backend,
{
    /// Create a parser for the strict JSON grammar.
    pub fn new(backend: B) -> Self {
        Self::new_with_options(backend, ParserOptions::default())
    }

    /// Create a parser accepting the given grammar extensions.
    pub fn with_extensions(backend: B, extensions: Extensions) -> Self {
        Self::new_with_options(
            backend,
            ParserOptions {
                extensions,
                ..ParserOptions::default()
            },
        )
    }

    /// Create a parser using the given [`ParserOptions`].
    pub fn new_with_options(backend: B, options: ParserOptions) -> Self {
        Self::with_policies(backend, options)
    }
}

impl<B, P> Parser<B, P>
where
    B: Backend,
    P: Policies,
{
    /// Create a parser with a custom [`Policies`] implementation. Name the
    /// policy type explicitly: `Parser::<_, MyPolicies>::with_policies(…)`.
    pub fn with_policies(backend: B, options: ParserOptions) -> Self {
        Parser {
            decoder: ByteDecoder::new(),
            stack: vec![Matcher::eof(), Matcher::whitespace(), Matcher::root()],
            max_depth: options.max_depth,
            matcher_pos: Coord::default(),
            ctx: Context {
                buffer: Vec::new(),
                error: None,
                pos: Coord::default(),
                extensions: options.extensions,
                backend,
                _policies: PhantomData,
            },
        }
    }

    /// Parse a chunk of input. This method may be called repeatedly with
    /// portions of the source data, for example as the data is received
    /// from an external source; successive chunks concatenate into a single
    /// logical document. Once all of the data has been delivered, call
    /// [`eof`](Parser::eof).
    pub fn input(&mut self, bytes: &[u8]) -> &mut Self {
        self.input_iter(bytes.iter().copied())
    }

    /// [`input`](Parser::input) for an arbitrary byte iterator.
    pub fn input_iter<I>(&mut self, bytes: I) -> &mut Self
    where
        I: IntoIterator<Item = u8>,
    {
        if self.ctx.error.is_some() {
            return self;
        }
        for byte in bytes {
            for code_point in self.decoder.feed(byte) {
                if self.ctx.error.is_some() {
                    return self;
                }
                self.consume_code_point(code_point);
                if self.ctx.error.is_none() {
                    self.ctx.pos.next_column();
                }
            }
        }
        self
    }

    /// Inform the parser that the complete input has been delivered.
    ///
    /// Returns the backend's result, whether or not the parse succeeded;
    /// consult [`last_error`](Parser::last_error) first.
    pub fn eof(&mut self) -> B::Output {
        if self.ctx.error.is_none() {
            // Flush any partial code point out of the decoder.
            for code_point in self.decoder.end() {
                if self.ctx.error.is_some() {
                    break;
                }
                self.consume_code_point(code_point);
                if self.ctx.error.is_none() {
                    self.ctx.pos.next_column();
                }
            }
        }
        while self.ctx.error.is_none() {
            let step = match self.stack.last_mut() {
                Some(top) => top.consume(&mut self.ctx, None),
                None => break,
            };
            debug_assert!(step.1, "the EOF sentinel must always be consumed");
            debug_assert!(
                self.stack.last().map_or(true, Matcher::is_done),
                "a matcher receiving EOF must finish"
            );
            self.stack.pop();
        }
        self.ctx.backend.result()
    }

    /// True if the parser has recorded an error.
    pub fn has_error(&self) -> bool {
        self.ctx.error.is_some()
    }

    /// The sticky error recorded by the parser, if any.
    pub fn last_error(&self) -> Option<Error> {
        self.ctx.error
    }

    /// The position where the most recent token started. 1-based.
    pub fn pos(&self) -> Coord {
        self.matcher_pos
    }

    /// The position of the next code point to be consumed. 1-based.
    pub fn input_pos(&self) -> Coord {
        self.ctx.pos
    }

    /// The extensions this parser was constructed with.
    pub fn extensions(&self) -> Extensions {
        self.ctx.extensions
    }

    /// Access the backend.
    pub fn backend(&self) -> &B {
        &self.ctx.backend
    }

    /// Mutable access to the backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.ctx.backend
    }

    /// Offer one code point to the top of the matcher stack, popping
    /// finished matchers and pushing children until somebody consumes it.
    fn consume_code_point(&mut self, code_point: char) {
        loop {
            let (child, consumed) = match self.stack.last_mut() {
                Some(top) => top.consume(&mut self.ctx, Some(code_point)),
                // Input arriving after eof() has unwound the stack.
                None => return,
            };
            if self.ctx.error.is_some() {
                return;
            }
            if self.stack.last().map_or(false, Matcher::is_done) {
                self.stack.pop();
            }
            if let Some(matcher) = child {
                // Only the container matchers count against the nesting
                // limit; everything else on the stack is the two permanent
                // sentinels or a short-lived terminal.
                if matcher.is_container() && self.stack.len().saturating_sub(2) >= self.max_depth {
                    log::debug!(
                        "nesting limit of {} exceeded at {}",
                        self.max_depth,
                        self.ctx.pos
                    );
                    self.ctx.record_error(Error::NestingTooDeep);
                    return;
                }
                self.matcher_pos = self.ctx.pos;
                self.stack.push(matcher);
            }
            if consumed {
                return;
            }
        }
    }
}

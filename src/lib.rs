//! # PeeJay
//!
//! A streaming, push-style JSON parser.
//!
//! Feed the parser an arbitrary byte stream in chunks; it decodes Unicode,
//! recognizes the JSON grammar, and emits typed events ("begin object",
//! "integer value", "key", …) to a caller-supplied [`Backend`]. Parsing
//! produces no tree; the backend decides what, if anything, to materialize.
//!
//! ## Examples
//!
//! ### Push-based parsing
//!
//! Implement [`Backend`] and push chunks of bytes into the parser whenever
//! they are available. A backend only implements the callbacks it cares
//! about; everything else is accepted and discarded.
//!
//! ```
//! use peejay::{Backend, Error, Parser};
//!
//! /// Sums every number in the document.
//! #[derive(Default)]
//! struct Sum(f64);
//!
//! impl Backend for Sum {
//!     type Output = f64;
//!
//!     fn integer_value(&mut self, value: i64) -> Result<(), Error> {
//!         self.0 += value as f64;
//!         Ok(())
//!     }
//!
//!     fn double_value(&mut self, value: f64) -> Result<(), Error> {
//!         self.0 += value;
//!         Ok(())
//!     }
//!
//!     fn result(&mut self) -> f64 {
//!         self.0
//!     }
//! }
//!
//! let mut parser = Parser::new(Sum::default());
//! // Chunk boundaries may fall anywhere, even inside a token.
//! parser.input(b"[1, 2.5, {\"a\": 4");
//! parser.input(b"2}]");
//! let sum = parser.eof();
//! assert!(!parser.has_error());
//! assert_eq!(sum, 45.5);
//! ```
//!
//! ### Validating input
//!
//! The [`Null`] backend accepts every event, which makes the parser a pure
//! validator:
//!
//! ```
//! use peejay::{Error, Null, Parser};
//!
//! let mut parser = Parser::new(Null);
//! parser.input(b"[1, 2,, 3]").eof();
//! assert_eq!(parser.last_error(), Some(Error::ExpectedToken));
//! ```
//!
//! ### Grammar extensions
//!
//! A fixed set of optional relaxations (comments, trailing commas, single
//! quoted strings, relaxed numbers, …) can be enabled when the parser is
//! constructed:
//!
//! ```
//! use peejay::{Extensions, Null, Parser};
//!
//! let json = b"{ \"a\": [1, 2, 3,], // comment\n }";
//! let mut parser = Parser::with_extensions(
//!     Null,
//!     Extensions::ARRAY_TRAILING_COMMA
//!         | Extensions::OBJECT_TRAILING_COMMA
//!         | Extensions::SINGLE_LINE_COMMENTS,
//! );
//! parser.input(json).eof();
//! assert!(!parser.has_error());
//! ```
//!
//! ### Encodings
//!
//! Input may be UTF-8, UTF-16, or UTF-32 in either byte order; the encoding
//! is detected from a leading byte order mark and defaults to UTF-8. The
//! emitted events are identical whatever the source encoding:
//!
//! ```
//! use peejay::{Null, Parser};
//!
//! // "7" as UTF-16 BE with a BOM.
//! let mut parser = Parser::new(Null);
//! parser.input(b"\xFE\xFF\x00\x37").eof();
//! assert!(!parser.has_error());
//! ```
//!
//! ### Parsing into a Serde JSON Value
//!
//! For testing and compatibility reasons, PeeJay can parse a byte slice
//! into a [Serde JSON](https://github.com/serde-rs/json) `Value` (enable
//! the `serde_json` feature):
//!
//! ```ignore
//! use peejay::serde_json::from_slice;
//!
//! let value = from_slice(br#"{"name": "Elvis"}"#).unwrap();
//! assert_eq!(value["name"], "Elvis");
//! ```
//!
//! However, if the whole document fits in memory and no streaming is
//! needed, using Serde JSON directly is most likely the better choice.

mod backend;
mod coord;
mod cprun;
mod error;
mod extensions;
mod grammar;
mod matcher;
mod options;
mod parser;
mod policies;
mod utf;

#[cfg(feature = "serde_json")]
pub mod serde_json;

#[cfg(feature = "tokio")]
pub mod tokio;

pub use backend::{Backend, Null};
pub use coord::Coord;
pub use error::Error;
pub use extensions::{Extensions, UnknownExtensionError};
pub use options::{ParserOptions, ParserOptionsBuilder};
pub use parser::Parser;
pub use policies::{DefaultPolicies, Policies};

use crate::error::Error;

/// The event sink driven by a [`Parser`](crate::Parser).
///
/// As the parser recognizes the contents of the input, it invokes the
/// matching callback. Events arrive strictly in document order:
/// [`begin_array`](Backend::begin_array)/[`begin_object`](Backend::begin_object)
/// precede every callback for their contents, the matching `end_*` callback
/// follows them, and [`key`](Backend::key) precedes the value callback for
/// its member.
///
/// Every callback returns a `Result`; returning an error aborts the parse
/// and the error becomes the parser's sticky error. The default
/// implementations accept every event, so a backend only implements the
/// callbacks it cares about:
///
/// ```
/// use peejay::{Backend, Error, Parser};
///
/// #[derive(Default)]
/// struct KeyCollector {
///     keys: Vec<String>,
/// }
///
/// impl Backend for KeyCollector {
///     type Output = Vec<String>;
///
///     fn key(&mut self, key: &str) -> Result<(), Error> {
///         self.keys.push(key.to_owned());
///         Ok(())
///     }
///
///     fn result(&mut self) -> Vec<String> {
///         std::mem::take(&mut self.keys)
///     }
/// }
///
/// let mut parser = Parser::new(KeyCollector::default());
/// parser.input(br#"{"a": 1, "b": [true, null]}"#);
/// let keys = parser.eof();
/// assert!(!parser.has_error());
/// assert_eq!(keys, vec!["a".to_owned(), "b".to_owned()]);
/// ```
///
/// The `&str` arguments borrow the parser's internal buffer and are only
/// valid for the duration of the call; copy them if they need to outlive it.
pub trait Backend {
    /// The value produced by [`result`](Backend::result) and returned from
    /// [`Parser::eof`](crate::Parser::eof).
    type Output;

    /// The start of an array.
    fn begin_array(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// The end of an array. Always follows an earlier
    /// [`begin_array`](Backend::begin_array).
    fn end_array(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// The start of an object.
    fn begin_object(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// An object member's key. The value callbacks for the member follow.
    fn key(&mut self, key: &str) -> Result<(), Error> {
        let _ = key;
        Ok(())
    }

    /// The end of an object. Always follows an earlier
    /// [`begin_object`](Backend::begin_object).
    fn end_object(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// A string value.
    fn string_value(&mut self, value: &str) -> Result<(), Error> {
        let _ = value;
        Ok(())
    }

    /// An integer value. Numbers written in floating-point notation whose
    /// value is an exact in-range integer are delivered here as well, so
    /// `1.0` and `1` are observationally equal.
    fn integer_value(&mut self, value: i64) -> Result<(), Error> {
        let _ = value;
        Ok(())
    }

    /// A floating-point value.
    fn double_value(&mut self, value: f64) -> Result<(), Error> {
        let _ = value;
        Ok(())
    }

    /// The keyword `true` or `false`.
    fn boolean_value(&mut self, value: bool) -> Result<(), Error> {
        let _ = value;
        Ok(())
    }

    /// The keyword `null`.
    fn null_value(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Produce the backend's final output. Called by
    /// [`Parser::eof`](crate::Parser::eof) whether or not the parse
    /// succeeded; callers are expected to consult
    /// [`Parser::last_error`](crate::Parser::last_error) first.
    fn result(&mut self) -> Self::Output;
}

/// A backend that accepts every event and produces nothing. Useful for
/// validating input.
///
/// ```
/// use peejay::{Null, Parser};
///
/// let mut parser = Parser::new(Null);
/// parser.input(b"[1, 2, 3]").eof();
/// assert!(!parser.has_error());
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Null;

impl Backend for Null {
    type Output = ();

    fn result(&mut self) -> Self::Output {}
}

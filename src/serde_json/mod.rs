//! Parsing into a Serde JSON [`Value`] for testing and compatibility. The
//! builder here is an ordinary [`Backend`]; nothing in the parser itself
//! knows about the value model.

use serde_json::{Map, Number, Value};

use crate::{Backend, Error, Parser, ParserOptions};

/// A [`Backend`] that materializes the event stream as a Serde JSON
/// [`Value`].
#[derive(Debug, Default)]
pub struct ValueBuilder {
    /// Open containers, innermost last. Keys wait here for their value.
    stack: Vec<(Option<String>, Value)>,
    /// The key of the member currently being parsed.
    current_key: Option<String>,
    result: Option<Value>,
}

impl ValueBuilder {
    pub fn new() -> Self {
        ValueBuilder::default()
    }

    /// Attach a completed value to the enclosing container, or make it the
    /// final result if there is none.
    fn attach(&mut self, value: Value) -> Result<(), Error> {
        match self.stack.last_mut() {
            Some((_, Value::Object(map))) => {
                let Some(key) = self.current_key.take() else {
                    return Err(Error::ExpectedObjectKey);
                };
                // Duplicate keys are the backend's concern; keep the last.
                map.insert(key, value);
            }
            Some((_, Value::Array(elements))) => elements.push(value),
            _ => self.result = Some(value),
        }
        Ok(())
    }

    fn begin(&mut self, container: Value) {
        self.stack.push((self.current_key.take(), container));
    }

    fn end(&mut self) -> Result<(), Error> {
        let Some((key, value)) = self.stack.pop() else {
            return Err(Error::UnexpectedExtraInput);
        };
        self.current_key = key;
        self.attach(value)
    }
}

impl Backend for ValueBuilder {
    type Output = Option<Value>;

    fn begin_array(&mut self) -> Result<(), Error> {
        self.begin(Value::Array(vec![]));
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), Error> {
        self.end()
    }

    fn begin_object(&mut self) -> Result<(), Error> {
        self.begin(Value::Object(Map::new()));
        Ok(())
    }

    fn key(&mut self, key: &str) -> Result<(), Error> {
        self.current_key = Some(key.to_owned());
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), Error> {
        self.end()
    }

    fn string_value(&mut self, value: &str) -> Result<(), Error> {
        self.attach(Value::String(value.to_owned()))
    }

    fn integer_value(&mut self, value: i64) -> Result<(), Error> {
        self.attach(Value::Number(Number::from(value)))
    }

    fn double_value(&mut self, value: f64) -> Result<(), Error> {
        // Serde JSON has no representation for NaN or the infinities.
        let number = Number::from_f64(value).ok_or(Error::NumberOutOfRange)?;
        self.attach(Value::Number(number))
    }

    fn boolean_value(&mut self, value: bool) -> Result<(), Error> {
        self.attach(Value::Bool(value))
    }

    fn null_value(&mut self) -> Result<(), Error> {
        self.attach(Value::Null)
    }

    fn result(&mut self) -> Self::Output {
        self.result.take()
    }
}

/// Parse a byte slice into a Serde JSON [`Value`]
///
/// ```
/// use serde_json::json;
/// use peejay::serde_json::from_slice;
///
/// let json = r#"{"name": "Elvis"}"#.as_bytes();
/// let expected = json!({
///     "name": "Elvis"
/// });
/// let actual = from_slice(json).unwrap();
/// assert_eq!(expected, actual);
/// ```
pub fn from_slice(v: &[u8]) -> Result<Value, Error> {
    from_slice_with_options(v, ParserOptions::default())
}

/// Parse a byte slice into a Serde JSON [`Value`] using the given parser
/// options
pub fn from_slice_with_options(v: &[u8], options: ParserOptions) -> Result<Value, Error> {
    let mut parser = Parser::new_with_options(ValueBuilder::new(), options);
    let value = parser.input(v).eof();
    if let Some(err) = parser.last_error() {
        return Err(err);
    }
    value.ok_or(Error::ExpectedToken)
}

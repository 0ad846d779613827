//! A backend that records every event it receives, shared by the
//! integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use peejay::{Backend, Error, Extensions, Parser, ParserOptions, ParserOptionsBuilder};

/// One recorded backend callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    BeginArray,
    EndArray,
    BeginObject,
    Key(String),
    EndObject,
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Null,
}

/// Records the callbacks fired during a parse.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Backend for Recorder {
    type Output = Vec<Event>;

    fn begin_array(&mut self) -> Result<(), Error> {
        self.events.push(Event::BeginArray);
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), Error> {
        self.events.push(Event::EndArray);
        Ok(())
    }

    fn begin_object(&mut self) -> Result<(), Error> {
        self.events.push(Event::BeginObject);
        Ok(())
    }

    fn key(&mut self, key: &str) -> Result<(), Error> {
        self.events.push(Event::Key(key.to_owned()));
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), Error> {
        self.events.push(Event::EndObject);
        Ok(())
    }

    fn string_value(&mut self, value: &str) -> Result<(), Error> {
        self.events.push(Event::String(value.to_owned()));
        Ok(())
    }

    fn integer_value(&mut self, value: i64) -> Result<(), Error> {
        self.events.push(Event::Integer(value));
        Ok(())
    }

    fn double_value(&mut self, value: f64) -> Result<(), Error> {
        self.events.push(Event::Double(value));
        Ok(())
    }

    fn boolean_value(&mut self, value: bool) -> Result<(), Error> {
        self.events.push(Event::Boolean(value));
        Ok(())
    }

    fn null_value(&mut self) -> Result<(), Error> {
        self.events.push(Event::Null);
        Ok(())
    }

    fn result(&mut self) -> Self::Output {
        std::mem::take(&mut self.events)
    }
}

/// A backend that fails with the given error after a fixed number of
/// callbacks, for testing cancellation.
#[derive(Debug)]
pub struct FailAfter {
    pub remaining: usize,
    pub error: Error,
    pub calls: usize,
}

impl FailAfter {
    pub fn new(remaining: usize, error: Error) -> Self {
        FailAfter {
            remaining,
            error,
            calls: 0,
        }
    }

    fn tick(&mut self) -> Result<(), Error> {
        self.calls += 1;
        if self.calls > self.remaining {
            return Err(self.error);
        }
        Ok(())
    }
}

impl Backend for FailAfter {
    type Output = usize;

    fn begin_array(&mut self) -> Result<(), Error> {
        self.tick()
    }

    fn end_array(&mut self) -> Result<(), Error> {
        self.tick()
    }

    fn begin_object(&mut self) -> Result<(), Error> {
        self.tick()
    }

    fn key(&mut self, _key: &str) -> Result<(), Error> {
        self.tick()
    }

    fn end_object(&mut self) -> Result<(), Error> {
        self.tick()
    }

    fn string_value(&mut self, _value: &str) -> Result<(), Error> {
        self.tick()
    }

    fn integer_value(&mut self, _value: i64) -> Result<(), Error> {
        self.tick()
    }

    fn double_value(&mut self, _value: f64) -> Result<(), Error> {
        self.tick()
    }

    fn boolean_value(&mut self, _value: bool) -> Result<(), Error> {
        self.tick()
    }

    fn null_value(&mut self) -> Result<(), Error> {
        self.tick()
    }

    fn result(&mut self) -> Self::Output {
        self.calls
    }
}

/// Parse `input` in one chunk with the given extensions and return the
/// recorded events alongside the sticky error.
pub fn events_with_extensions(
    input: &[u8],
    extensions: Extensions,
) -> (Vec<Event>, Option<Error>) {
    let mut parser = Parser::with_extensions(Recorder::default(), extensions);
    let events = parser.input(input).eof();
    (events, parser.last_error())
}

/// Parse strict-grammar `input` in one chunk.
pub fn events(input: &[u8]) -> (Vec<Event>, Option<Error>) {
    events_with_extensions(input, Extensions::NONE)
}

/// Parse `input` delivering `chunk` bytes per `input()` call.
pub fn events_chunked(
    input: &[u8],
    extensions: Extensions,
    chunk: usize,
) -> (Vec<Event>, Option<Error>) {
    let mut parser = Parser::with_extensions(Recorder::default(), extensions);
    for piece in input.chunks(chunk.max(1)) {
        parser.input(piece);
    }
    let events = parser.eof();
    (events, parser.last_error())
}

/// Build parser options enabling `extensions`.
#[allow(dead_code)]
pub fn options(extensions: Extensions) -> ParserOptions {
    ParserOptionsBuilder::default()
        .with_extensions(extensions)
        .build()
}

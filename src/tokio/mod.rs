//! Feeding the parser from asynchronous sources.

use thiserror::Error as ThisError;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{Backend, Error, Parser, ParserOptions};

/// An error from [`from_reader`]: either the source failed or the parsed
/// text was not valid JSON.
#[derive(ThisError, Debug)]
pub enum ReadError {
    #[error("reading input failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] Error),
}

/// Read a complete JSON document from an asynchronous reader, feeding the
/// parser chunk by chunk as data arrives, and return the backend's result.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use peejay::tokio::from_reader;
/// use peejay::{Null, ParserOptions};
///
/// let json: &[u8] = br#"{"name": "Elvis"}"#;
/// from_reader(json, Null, ParserOptions::default()).await.unwrap();
/// # }
/// ```
pub async fn from_reader<R, B>(
    mut reader: R,
    backend: B,
    options: ParserOptions,
) -> Result<B::Output, ReadError>
where
    R: AsyncRead + Unpin,
    B: Backend,
{
    let mut parser = Parser::new_with_options(backend, options);
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        parser.input(&buf[..n]);
        if parser.has_error() {
            // The error is sticky; no point reading the rest.
            break;
        }
    }
    let output = parser.eof();
    match parser.last_error() {
        Some(err) => Err(err.into()),
        None => Ok(output),
    }
}

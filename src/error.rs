//! Error types for thumbfall.
//!
//! All errors use the `thiserror` crate for minimal boilerplate and proper
//! error trait implementations. Script execution itself cannot fail; only
//! loading and parsing the host document can.

use thiserror::Error;

/// Result type alias for thumbfall operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for thumbfall.
#[derive(Error, Debug)]
pub enum Error {
  /// HTML parsing error
  #[error("Parse error: {0}")]
  Parse(#[from] ParseError),

  /// I/O error (reading the input document)
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

/// Errors that occur while parsing the host HTML document.
#[derive(Error, Debug, Clone)]
pub enum ParseError {
  /// The input contained no markup at all.
  #[error("Empty HTML document")]
  EmptyDocument,

  /// The parser produced no usable document root.
  #[error("Invalid HTML: {message}")]
  InvalidHtml { message: String },
}

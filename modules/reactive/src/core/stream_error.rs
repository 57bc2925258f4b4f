//! Stream error definitions.

use alloc::string::String;


/// Errors travelling through a stream as its terminal `error` signal.
///
/// Failures raised by user-supplied key selectors and comparators use the same type, so downstream
/// consumers cannot tell them apart from upstream failures.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StreamError {
  /// The stream failed without further detail.
  #[error("stream failed")]
  Failed,
  /// The stream failed with a message.
  #[error("stream failed: {0}")]
  FailedWith(String),
  /// The stream neither completed nor failed synchronously.
  #[error("stream did not terminate synchronously")]
  Incomplete,
}

impl StreamError {
  /// Creates a [`StreamError::FailedWith`] from any string-like message.
  #[must_use]
  pub fn failed_with(message: impl Into<String>) -> Self {
    Self::FailedWith(message.into())
  }
}

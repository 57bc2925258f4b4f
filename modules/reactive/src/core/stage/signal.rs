use super::StreamError;

/// One notification delivered to a consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal<T> {
  /// A value.
  Next(T),
  /// Terminal failure.
  Error(StreamError),
  /// Terminal success.
  Complete,
}

impl<T> Signal<T> {
  /// Returns true for [`Signal::Error`] and [`Signal::Complete`].
  #[must_use]
  pub const fn is_terminal(&self) -> bool {
    matches!(self, Signal::Error(_) | Signal::Complete)
  }
}

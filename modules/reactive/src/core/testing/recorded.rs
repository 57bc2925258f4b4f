use super::Signal;

/// A signal observed at a virtual frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded<T> {
  frame:  u64,
  signal: Signal<T>,
}

impl<T> Recorded<T> {
  /// Creates a record.
  #[must_use]
  pub const fn new(frame: u64, signal: Signal<T>) -> Self {
    Self { frame, signal }
  }

  /// Returns the virtual frame.
  #[must_use]
  pub const fn frame(&self) -> u64 {
    self.frame
  }

  /// Returns the signal.
  #[must_use]
  pub const fn signal(&self) -> &Signal<T> {
    &self.signal
  }

  /// Consumes the record, returning the signal.
  #[must_use]
  pub fn into_signal(self) -> Signal<T> {
    self.signal
  }
}

use super::StreamError;

/// Receives the signals a [`Consumer`](super::Consumer) lets through.
///
/// The owning consumer guarantees that at most one of `on_error`/`on_complete` runs, that nothing
/// runs after it, and that nothing runs once the subscription has been cancelled.
pub trait SignalHandler<T> {
  /// Handles a value.
  fn on_next(&mut self, value: T);

  /// Handles terminal failure.
  fn on_error(&mut self, error: StreamError);

  /// Handles terminal success.
  fn on_complete(&mut self);
}

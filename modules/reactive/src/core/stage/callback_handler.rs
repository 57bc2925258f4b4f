use alloc::boxed::Box;

use super::{SignalHandler, StreamError};

type NextCallback<T> = Box<dyn FnMut(T) + Send>;
type ErrorCallback = Box<dyn FnMut(StreamError) + Send>;
type CompleteCallback = Box<dyn FnMut() + Send>;

/// Signal handler built from closures.
///
/// Missing error/complete callbacks ignore the signal.
pub struct CallbackHandler<T> {
  next:     NextCallback<T>,
  error:    Option<ErrorCallback>,
  complete: Option<CompleteCallback>,
}

impl<T> CallbackHandler<T> {
  /// Creates a handler that only observes values.
  #[must_use]
  pub fn new<N>(next: N) -> Self
  where
    N: FnMut(T) + Send + 'static, {
    Self { next: Box::new(next), error: None, complete: None }
  }

  /// Sets the error callback.
  #[must_use]
  pub fn with_error<E>(mut self, error: E) -> Self
  where
    E: FnMut(StreamError) + Send + 'static, {
    self.error = Some(Box::new(error));
    self
  }

  /// Sets the completion callback.
  #[must_use]
  pub fn with_complete<C>(mut self, complete: C) -> Self
  where
    C: FnMut() + Send + 'static, {
    self.complete = Some(Box::new(complete));
    self
  }
}

impl<T> SignalHandler<T> for CallbackHandler<T> {
  fn on_next(&mut self, value: T) {
    (self.next)(value);
  }

  fn on_error(&mut self, error: StreamError) {
    if let Some(callback) = self.error.as_mut() {
      callback(error);
    }
  }

  fn on_complete(&mut self) {
    if let Some(callback) = self.complete.as_mut() {
      callback();
    }
  }
}

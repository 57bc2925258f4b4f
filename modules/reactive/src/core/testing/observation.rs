use alloc::{sync::Arc, vec::Vec};

use spin::Mutex;

use super::Recorded;

/// Signals recorded from one subscription driven by a [`TestScheduler`](super::TestScheduler).
pub struct Observation<T> {
  signals: Arc<Mutex<Vec<Recorded<T>>>>,
}

impl<T> Observation<T> {
  pub(super) fn new(signals: Arc<Mutex<Vec<Recorded<T>>>>) -> Self {
    Self { signals }
  }

  /// Returns the number of recorded signals.
  #[must_use]
  pub fn len(&self) -> usize {
    self.signals.lock().len()
  }

  /// Returns true when nothing was recorded.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.signals.lock().is_empty()
  }
}

impl<T: Clone> Observation<T> {
  /// Returns a snapshot of the recorded signals in delivery order.
  #[must_use]
  pub fn signals(&self) -> Vec<Recorded<T>> {
    self.signals.lock().clone()
  }
}

impl<T> Clone for Observation<T> {
  fn clone(&self) -> Self {
    Self { signals: self.signals.clone() }
  }
}

use alloc::sync::Arc;

use super::{Consumer, Producer, SignalHandler, StreamError};


type KeySelector<T, K> = dyn Fn(&T) -> Result<K, StreamError> + Send + Sync;
type Comparator<K> = dyn Fn(&K, &K) -> Result<bool, StreamError> + Send + Sync;

/// Operator that drops values whose key equals the key of the last forwarded value.
///
/// The key selector projects each value to the key that is compared. The comparator receives
/// `(previous, current)` and returns `true` when the two keys count as unchanged. The first value
/// of a subscription always passes. A failing selector or comparator terminates the stream with
/// its error.
pub struct DistinctUntilChanged<T, K> {
  key_selector: Arc<KeySelector<T, K>>,
  comparator:   Arc<Comparator<K>>,
}

impl<T> DistinctUntilChanged<T, T>
where
  T: Clone + PartialEq + 'static,
{
  /// Compares the values themselves with `==`.
  #[must_use]
  pub fn new() -> Self {
    Self::comparing(|previous: &T, current: &T| Ok(previous == current))
  }
}

impl<T> DistinctUntilChanged<T, T>
where
  T: Clone + 'static,
{
  /// Compares the values themselves with `comparator`.
  #[must_use]
  pub fn comparing<C>(comparator: C) -> Self
  where
    C: Fn(&T, &T) -> Result<bool, StreamError> + Send + Sync + 'static, {
    Self::by_key_comparing(|value: &T| Ok(value.clone()), comparator)
  }
}

impl<T, K> DistinctUntilChanged<T, K>
where
  K: PartialEq + 'static,
  T: 'static,
{
  /// Compares the keys projected by `key_selector` with `==`.
  #[must_use]
  pub fn by_key<S>(key_selector: S) -> Self
  where
    S: Fn(&T) -> Result<K, StreamError> + Send + Sync + 'static, {
    Self::by_key_comparing(key_selector, |previous: &K, current: &K| Ok(previous == current))
  }
}

impl<T, K> DistinctUntilChanged<T, K>
where
  T: 'static,
  K: 'static,
{
  /// Compares the keys projected by `key_selector` with `comparator`.
  #[must_use]
  pub fn by_key_comparing<S, C>(key_selector: S, comparator: C) -> Self
  where
    S: Fn(&T) -> Result<K, StreamError> + Send + Sync + 'static,
    C: Fn(&K, &K) -> Result<bool, StreamError> + Send + Sync + 'static, {
    Self { key_selector: Arc::new(key_selector), comparator: Arc::new(comparator) }
  }

  /// Replaces the comparator, keeping the key selector.
  #[must_use]
  pub fn with_comparator<C>(self, comparator: C) -> Self
  where
    C: Fn(&K, &K) -> Result<bool, StreamError> + Send + Sync + 'static, {
    Self { key_selector: self.key_selector, comparator: Arc::new(comparator) }
  }

  /// Applies the operator to `upstream`.
  #[must_use]
  pub fn apply(self, upstream: &Producer<T>) -> Producer<T>
  where
    T: Send,
    K: Send, {
    upstream.lift(move |downstream: &Consumer<T>| {
      Consumer::forwarding(downstream, DistinctHandler {
        downstream:   downstream.clone(),
        key_selector: self.key_selector.clone(),
        comparator:   self.comparator.clone(),
        state:        DistinctState::AwaitingFirst,
      })
    })
  }
}

impl<T> Default for DistinctUntilChanged<T, T>
where
  T: Clone + PartialEq + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<T, K> Clone for DistinctUntilChanged<T, K> {
  fn clone(&self) -> Self {
    Self { key_selector: self.key_selector.clone(), comparator: self.comparator.clone() }
  }
}

impl<T> Producer<T>
where
  T: Send + 'static,
{
  /// Drops values equal to the last forwarded value.
  #[must_use]
  pub fn distinct_until_changed(&self) -> Producer<T>
  where
    T: Clone + PartialEq, {
    DistinctUntilChanged::new().apply(self)
  }

  /// Drops values that `comparator(previous, current)` reports as unchanged.
  #[must_use]
  pub fn distinct_until_changed_by<C>(&self, comparator: C) -> Producer<T>
  where
    T: Clone,
    C: Fn(&T, &T) -> Result<bool, StreamError> + Send + Sync + 'static, {
    DistinctUntilChanged::comparing(comparator).apply(self)
  }

  /// Drops values whose projected key equals the key of the last forwarded value.
  #[must_use]
  pub fn distinct_until_changed_by_key<K, S>(&self, key_selector: S) -> Producer<T>
  where
    K: PartialEq + Send + 'static,
    S: Fn(&T) -> Result<K, StreamError> + Send + Sync + 'static, {
    DistinctUntilChanged::by_key(key_selector).apply(self)
  }

  /// Applies a configured [`DistinctUntilChanged`] operator.
  #[must_use]
  pub fn distinct_until_changed_with<K>(&self, operator: DistinctUntilChanged<T, K>) -> Producer<T>
  where
    K: Send + 'static, {
    operator.apply(self)
  }
}

enum DistinctState<K> {
  AwaitingFirst,
  HaveLast(K),
}

struct DistinctHandler<T, K> {
  downstream:   Consumer<T>,
  key_selector: Arc<KeySelector<T, K>>,
  comparator:   Arc<Comparator<K>>,
  state:        DistinctState<K>,
}

impl<T, K> SignalHandler<T> for DistinctHandler<T, K> {
  fn on_next(&mut self, value: T) {
    let key = match (self.key_selector)(&value) {
      | Ok(key) => key,
      | Err(error) => return self.downstream.error(error),
    };
    if let DistinctState::HaveLast(last) = &self.state {
      match (self.comparator)(last, &key) {
        | Ok(true) => return,
        | Ok(false) => {},
        | Err(error) => return self.downstream.error(error),
      }
    }
    self.state = DistinctState::HaveLast(key);
    self.downstream.next(value);
  }

  fn on_error(&mut self, error: StreamError) {
    self.downstream.error(error);
  }

  fn on_complete(&mut self) {
    self.downstream.complete();
  }
}

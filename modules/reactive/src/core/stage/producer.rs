use alloc::{sync::Arc, vec::Vec};

use spin::Mutex;

use super::{CallbackHandler, Consumer, LOG_TARGET, StreamError, TeardownRegistry};


type SubscribeFn<T> = dyn Fn(&Consumer<T>) -> Result<TeardownRegistry, StreamError> + Send + Sync;

/// Deferred, re-subscribable source of signals.
///
/// A producer does nothing until subscribed. Every call to [`Producer::subscribe`] runs the
/// subscribe procedure again, so subscriptions never share state.
pub struct Producer<T> {
  subscribe_fn: Arc<SubscribeFn<T>>,
}

impl<T> Producer<T>
where
  T: Send + 'static,
{
  /// Creates a producer from a subscribe procedure.
  ///
  /// The procedure emits through the consumer it receives, either before returning or later from a
  /// clone it keeps. Cleanup goes on [`Consumer::add_teardown`]. Procedures that emit in a loop
  /// must poll [`Consumer::is_closed`] between emissions so cancellation stops them promptly.
  #[must_use]
  pub fn new<F>(procedure: F) -> Self
  where
    F: Fn(&Consumer<T>) -> Result<(), StreamError> + Send + Sync + 'static, {
    Self::from_procedure(move |consumer| {
      procedure(consumer)?;
      Ok(consumer.registry().clone())
    })
  }

  fn from_procedure<F>(procedure: F) -> Self
  where
    F: Fn(&Consumer<T>) -> Result<TeardownRegistry, StreamError> + Send + Sync + 'static, {
    Self { subscribe_fn: Arc::new(procedure) }
  }

  /// Creates a producer that completes immediately.
  #[must_use]
  pub fn empty() -> Self {
    Self::new(|consumer| {
      consumer.complete();
      Ok(())
    })
  }

  /// Creates a producer that never signals.
  #[must_use]
  pub fn never() -> Self {
    Self::new(|_| Ok(()))
  }

  /// Creates a producer that fails immediately with `error`.
  #[must_use]
  pub fn failed(error: StreamError) -> Self {
    Self::new(move |_| Err(error.clone()))
  }

  /// Creates a producer that emits `value` and completes, synchronously.
  #[must_use]
  pub fn single(value: T) -> Self
  where
    T: Clone + Sync, {
    Self::new(move |consumer| {
      consumer.next(value.clone());
      consumer.complete();
      Ok(())
    })
  }

  /// Creates a producer from an optional element.
  ///
  /// Emits one element when `value` is [`Some`], otherwise completes immediately.
  #[must_use]
  pub fn from_option(value: Option<T>) -> Self
  where
    T: Clone + Sync, {
    match value {
      | Some(value) => Self::single(value),
      | None => Self::empty(),
    }
  }

  /// Creates a producer that replays the collected elements to every subscriber.
  ///
  /// Emission stops as soon as the consumer is closed.
  #[must_use]
  pub fn from_iterator<I>(values: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Clone + Sync, {
    let values = values.into_iter().collect::<Vec<T>>();
    Self::new(move |consumer| {
      for value in &values {
        if consumer.is_closed() {
          return Ok(());
        }
        consumer.next(value.clone());
      }
      consumer.complete();
      Ok(())
    })
  }

  /// Subscribes `consumer` and returns the registry that cancels the subscription.
  ///
  /// A failure raised by the subscribe procedure is delivered as the consumer's error, unless the
  /// consumer is already closed, in which case it is dropped.
  pub fn subscribe(&self, consumer: Consumer<T>) -> TeardownRegistry {
    tracing::trace!(target: LOG_TARGET, "subscribing consumer");
    match (self.subscribe_fn)(&consumer) {
      | Ok(registry) => registry,
      | Err(error) => {
        if !consumer.is_closed() {
          consumer.error(error);
        }
        consumer.registry().clone()
      },
    }
  }

  /// Subscribes a value callback.
  pub fn subscribe_fn<N>(&self, next: N) -> TeardownRegistry
  where
    N: FnMut(T) + Send + 'static, {
    self.subscribe(Consumer::from_fn(next))
  }

  /// Subscribes value, error and completion callbacks.
  pub fn subscribe_with<N, E, C>(&self, next: N, error: E, complete: C) -> TeardownRegistry
  where
    N: FnMut(T) + Send + 'static,
    E: FnMut(StreamError) + Send + 'static,
    C: FnMut() + Send + 'static, {
    self.subscribe(Consumer::from_fns(next, error, complete))
  }

  /// Builds a producer whose subscribers are adapted by `transform` before reaching this one.
  ///
  /// Subscribing the returned producer with `downstream` subscribes this producer with
  /// `transform(&downstream)` and hands back the downstream registry. The upstream subscription
  /// must be governed by that registry: transforms built on [`Consumer::forwarding`] share it,
  /// and transforms that need to end the upstream early give it a child registry of it.
  #[must_use]
  pub fn lift<U, F>(&self, transform: F) -> Producer<U>
  where
    U: Send + 'static,
    F: Fn(&Consumer<U>) -> Consumer<T> + Send + Sync + 'static, {
    let upstream = self.clone();
    Producer::from_procedure(move |downstream| {
      tracing::trace!(target: LOG_TARGET, "subscribing through lifted operator");
      upstream.subscribe(transform(downstream));
      Ok(downstream.registry().clone())
    })
  }

  /// Applies a producer-to-producer operator.
  #[must_use]
  pub fn pipe<U, O>(self, operator: O) -> Producer<U>
  where
    O: FnOnce(Self) -> Producer<U>, {
    operator(self)
  }

  /// Subscribes synchronously and collects every value.
  ///
  /// # Errors
  ///
  /// Returns the stream's error when it failed, or [`StreamError::Incomplete`] when it did not
  /// terminate before `subscribe` returned. The subscription is cancelled in that case.
  pub fn collect_values(&self) -> Result<Vec<T>, StreamError> {
    let outcome = Arc::new(Mutex::new(CollectOutcome::<T> { values: Vec::new(), terminal: None }));
    let on_next = outcome.clone();
    let on_error = outcome.clone();
    let on_complete = outcome.clone();
    let handler = CallbackHandler::new(move |value| on_next.lock().values.push(value))
      .with_error(move |error| on_error.lock().terminal = Some(Err(error)))
      .with_complete(move || on_complete.lock().terminal = Some(Ok(())));
    let registry = self.subscribe(Consumer::new(handler));

    let (terminal, values) = {
      let mut guard = outcome.lock();
      (guard.terminal.take(), core::mem::take(&mut guard.values))
    };
    match terminal {
      | Some(Ok(())) => Ok(values),
      | Some(Err(error)) => Err(error),
      | None => {
        registry.dispose();
        Err(StreamError::Incomplete)
      },
    }
  }
}

impl Producer<i32> {
  /// Creates a producer that emits all integers between `start` and `end` (inclusive).
  #[must_use]
  pub fn range(start: i32, end: i32) -> Self {
    if start <= end {
      return Self::from_iterator(start..=end);
    }
    Self::from_iterator((end..=start).rev())
  }
}

impl<T> Clone for Producer<T> {
  fn clone(&self) -> Self {
    Self { subscribe_fn: self.subscribe_fn.clone() }
  }
}

struct CollectOutcome<T> {
  values:   Vec<T>,
  terminal: Option<Result<(), StreamError>>,
}

use alloc::{boxed::Box, collections::VecDeque, sync::Arc};

use portable_atomic::{AtomicBool, Ordering};
use spin::Mutex;

use super::{CallbackHandler, LOG_TARGET, Signal, SignalHandler, StreamError, TeardownRegistry};


/// Guarded sink for the signals of one subscription.
///
/// Every delivery checks the closed state first. A consumer closes when a terminal signal is
/// delivered or when its [`TeardownRegistry`] is disposed; after that every signal is dropped.
///
/// Clones share the same handler and state, so a producer may keep a clone to emit later.
pub struct Consumer<T> {
  cell: Arc<ConsumerCell<T>>,
}

impl<T> Consumer<T> {
  /// Creates a consumer owning a fresh registry.
  #[must_use]
  pub fn new<H>(handler: H) -> Self
  where
    H: SignalHandler<T> + Send + 'static, {
    Self::with_registry(TeardownRegistry::new(), handler)
  }

  /// Creates a consumer owning `registry`.
  ///
  /// The registry is disposed right after a terminal signal has been handled.
  #[must_use]
  pub fn with_registry<H>(registry: TeardownRegistry, handler: H) -> Self
  where
    H: SignalHandler<T> + Send + 'static, {
    Self::from_parts(registry, true, handler)
  }

  /// Creates an intermediate consumer that shares the registry of `downstream`.
  ///
  /// The returned consumer never disposes the shared registry itself; the downstream consumer does
  /// once the terminal signal reaches it. Operators use this so that cancelling the caller's
  /// registry reaches every upstream subscription.
  #[must_use]
  pub fn forwarding<U, H>(downstream: &Consumer<U>, handler: H) -> Self
  where
    H: SignalHandler<T> + Send + 'static, {
    Self::from_parts(downstream.registry().clone(), false, handler)
  }

  /// Creates a consumer from a value callback.
  #[must_use]
  pub fn from_fn<N>(next: N) -> Self
  where
    N: FnMut(T) + Send + 'static,
    T: 'static, {
    Self::new(CallbackHandler::new(next))
  }

  fn from_parts<H>(registry: TeardownRegistry, owns_registry: bool, handler: H) -> Self
  where
    H: SignalHandler<T> + Send + 'static, {
    let handler: Box<dyn SignalHandler<T> + Send> = Box::new(handler);
    let cell = ConsumerCell {
      handler: Mutex::new(handler),
      pending: Mutex::new(VecDeque::new()),
      stopped: AtomicBool::new(false),
      registry,
      owns_registry,
    };
    Self { cell: Arc::new(cell) }
  }

  /// Returns the registry governing this subscription.
  #[must_use]
  pub fn registry(&self) -> &TeardownRegistry {
    &self.cell.registry
  }

  /// Returns true once a terminal signal was delivered or the subscription was cancelled.
  #[must_use]
  pub fn is_closed(&self) -> bool {
    self.cell.stopped.load(Ordering::Acquire) || self.cell.registry.is_disposed()
  }

  /// Registers a cleanup action on the governing registry.
  pub fn add_teardown<F>(&self, action: F)
  where
    F: FnOnce() + Send + 'static, {
    self.cell.registry.add(action);
  }

  /// Delivers a value unless the consumer is closed.
  ///
  /// A value raised from inside this consumer's own handler is queued and delivered once the
  /// running handler returns.
  pub fn next(&self, value: T) {
    if self.is_closed() {
      return;
    }
    self.enqueue(Signal::Next(value));
  }

  /// Delivers terminal failure unless the consumer is closed.
  pub fn error(&self, error: StreamError) {
    self.terminate(Signal::Error(error));
  }

  /// Delivers terminal success unless the consumer is closed.
  pub fn complete(&self) {
    self.terminate(Signal::Complete);
  }

  /// Delivers any signal.
  pub fn deliver(&self, signal: Signal<T>) {
    match signal {
      | Signal::Next(value) => self.next(value),
      | Signal::Error(error) => self.error(error),
      | Signal::Complete => self.complete(),
    }
  }

  /// Cancels the subscription by disposing the governing registry.
  pub fn unsubscribe(&self) {
    self.cell.registry.dispose();
  }

  fn terminate(&self, signal: Signal<T>) {
    if self.cell.registry.is_disposed() {
      return;
    }
    // closed before the handler runs so later signals are dropped
    if self.cell.stopped.swap(true, Ordering::AcqRel) {
      return;
    }
    self.enqueue(signal);
  }

  fn enqueue(&self, signal: Signal<T>) {
    self.cell.pending.lock().push_back(signal);
    self.drain();
  }

  // Whoever holds the handler delivers the queue; a reentrant caller only enqueues.
  fn drain(&self) {
    loop {
      let Some(mut handler) = self.cell.handler.try_lock() else {
        tracing::trace!(target: LOG_TARGET, "signal queued behind the running handler");
        return;
      };
      let mut terminated = false;
      loop {
        let Some(signal) = self.cell.pending.lock().pop_front() else {
          break;
        };
        if self.cell.registry.is_disposed() {
          continue;
        }
        match signal {
          | Signal::Next(value) => handler.on_next(value),
          | Signal::Error(error) => {
            handler.on_error(error);
            terminated = true;
          },
          | Signal::Complete => {
            handler.on_complete();
            terminated = true;
          },
        }
      }
      drop(handler);
      if terminated && self.cell.owns_registry {
        self.cell.registry.dispose();
      }
      if self.cell.pending.lock().is_empty() {
        return;
      }
    }
  }
}

impl<T: 'static> Consumer<T> {
  /// Creates a consumer from value, error and completion callbacks.
  #[must_use]
  pub fn from_fns<N, E, C>(next: N, error: E, complete: C) -> Self
  where
    N: FnMut(T) + Send + 'static,
    E: FnMut(StreamError) + Send + 'static,
    C: FnMut() + Send + 'static, {
    Self::new(CallbackHandler::new(next).with_error(error).with_complete(complete))
  }
}

impl<T> Clone for Consumer<T> {
  fn clone(&self) -> Self {
    Self { cell: self.cell.clone() }
  }
}

impl<T> core::fmt::Debug for Consumer<T> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Consumer")
      .field("closed", &self.is_closed())
      .field("owns_registry", &self.cell.owns_registry)
      .field("registry", &self.cell.registry)
      .finish()
  }
}

struct ConsumerCell<T> {
  handler:       Mutex<Box<dyn SignalHandler<T> + Send>>,
  pending:       Mutex<VecDeque<Signal<T>>>,
  stopped:       AtomicBool,
  registry:      TeardownRegistry,
  owns_registry: bool,
}

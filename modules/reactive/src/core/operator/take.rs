use super::{Consumer, Producer, SignalHandler, StreamError, TeardownRegistry};


impl<T> Producer<T>
where
  T: Send + 'static,
{
  /// Forwards the first `count` values, then completes.
  ///
  /// The upstream subscription runs under its own child registry of the downstream registry. That
  /// child is disposed as soon as the last value is taken, so a synchronous upstream loop stops
  /// right after it whatever the operators further downstream do with the completion. `take(0)`
  /// completes without subscribing upstream.
  #[must_use]
  pub fn take(&self, count: usize) -> Producer<T> {
    if count == 0 {
      return Producer::empty();
    }
    self.lift(move |downstream: &Consumer<T>| {
      let parent = downstream.registry().clone();
      let registry = TeardownRegistry::new();
      parent.add_child(&registry);
      let handler = TakeHandler { downstream: downstream.clone(), parent, registry: registry.clone(), remaining: count };
      Consumer::with_registry(registry, handler)
    })
  }
}

struct TakeHandler<T> {
  downstream: Consumer<T>,
  parent:     TeardownRegistry,
  registry:   TeardownRegistry,
  remaining:  usize,
}

impl<T> TakeHandler<T> {
  fn release_upstream(&self) {
    self.registry.dispose();
    self.parent.remove_child(&self.registry);
  }
}

impl<T> SignalHandler<T> for TakeHandler<T> {
  fn on_next(&mut self, value: T) {
    if self.remaining == 0 {
      return;
    }
    self.remaining -= 1;
    self.downstream.next(value);
    if self.remaining == 0 {
      self.release_upstream();
      self.downstream.complete();
    }
  }

  fn on_error(&mut self, error: StreamError) {
    self.parent.remove_child(&self.registry);
    self.downstream.error(error);
  }

  fn on_complete(&mut self) {
    self.parent.remove_child(&self.registry);
    self.downstream.complete();
  }
}

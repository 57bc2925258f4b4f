use alloc::sync::Arc;

use spin::Mutex;

use super::{Consumer, Producer, SignalHandler, StreamError, TeardownRegistry};


type Project<T, U> = dyn Fn(T) -> Producer<U> + Send + Sync;

impl<T> Producer<T>
where
  T: Send + 'static,
{
  /// Maps each value to an inner producer and merges every inner stream into one.
  ///
  /// This producer and each inner one are subscribed under their own child registry of the
  /// downstream registry, so cancelling the caller's registry cancels all of them while this
  /// producer's subscription still ends as soon as it completes. Downstream completes once this
  /// producer has completed and no inner subscription is active; the first error from any side
  /// cancels the remaining subscriptions and terminates the result.
  #[must_use]
  pub fn merge_map<U, F>(&self, project: F) -> Producer<U>
  where
    U: Send + 'static,
    F: Fn(T) -> Producer<U> + Send + Sync + 'static, {
    let project: Arc<Project<T, U>> = Arc::new(project);
    self.lift(move |downstream: &Consumer<U>| {
      let parent = downstream.registry().clone();
      let registry = TeardownRegistry::new();
      parent.add_child(&registry);
      Consumer::with_registry(registry.clone(), OuterHandler {
        downstream: downstream.clone(),
        project: project.clone(),
        parent,
        registry,
        state: Arc::new(Mutex::new(MergeState { active: 0, outer_done: false })),
      })
    })
  }
}

struct MergeState {
  active:     usize,
  outer_done: bool,
}

struct OuterHandler<T, U> {
  downstream: Consumer<U>,
  project:    Arc<Project<T, U>>,
  parent:     TeardownRegistry,
  registry:   TeardownRegistry,
  state:      Arc<Mutex<MergeState>>,
}

impl<T, U> SignalHandler<T> for OuterHandler<T, U>
where
  U: Send + 'static,
{
  fn on_next(&mut self, value: T) {
    if self.downstream.is_closed() {
      return;
    }
    let inner = (self.project)(value);
    self.state.lock().active += 1;
    let registry = TeardownRegistry::new();
    self.parent.add_child(&registry);
    let handler = InnerHandler {
      downstream: self.downstream.clone(),
      parent:     self.parent.clone(),
      outer:      self.registry.clone(),
      registry:   registry.clone(),
      state:      self.state.clone(),
    };
    inner.subscribe(Consumer::with_registry(registry, handler));
  }

  fn on_error(&mut self, error: StreamError) {
    self.parent.remove_child(&self.registry);
    self.downstream.error(error);
  }

  fn on_complete(&mut self) {
    self.parent.remove_child(&self.registry);
    let finished = {
      let mut state = self.state.lock();
      state.outer_done = true;
      state.active == 0
    };
    if finished {
      self.downstream.complete();
    }
  }
}

struct InnerHandler<U> {
  downstream: Consumer<U>,
  parent:     TeardownRegistry,
  outer:      TeardownRegistry,
  registry:   TeardownRegistry,
  state:      Arc<Mutex<MergeState>>,
}

impl<U> SignalHandler<U> for InnerHandler<U> {
  fn on_next(&mut self, value: U) {
    self.downstream.next(value);
  }

  fn on_error(&mut self, error: StreamError) {
    self.parent.remove_child(&self.registry);
    self.outer.dispose();
    self.parent.remove_child(&self.outer);
    self.downstream.error(error);
  }

  fn on_complete(&mut self) {
    self.parent.remove_child(&self.registry);
    let finished = {
      let mut state = self.state.lock();
      state.active = state.active.saturating_sub(1);
      state.active == 0 && state.outer_done
    };
    if finished {
      self.downstream.complete();
    }
  }
}

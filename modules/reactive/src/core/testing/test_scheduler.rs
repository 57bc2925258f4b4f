use alloc::{boxed::Box, collections::BTreeMap, sync::Arc, vec::Vec};

use portable_atomic::{AtomicU64, Ordering};
use spin::Mutex;

use super::{
  CallbackHandler, Consumer, LOG_TARGET, MarbleError, Observation, Producer, Recorded, Signal, SubscriptionLog,
  TestProducer, TestSchedulerConfig,
  marble_parser::{parse_signals, parse_subscription_frames},
};

#[cfg(test)]
mod tests;

type ScheduledAction = Box<dyn FnOnce() + Send>;

/// Virtual-time scheduler driving marble-diagram tests.
///
/// Nothing runs until [`TestScheduler::flush`]. Actions run ordered by virtual frame, then by the
/// order they were scheduled in. Clones share the same clock and queue.
#[derive(Clone)]
pub struct TestScheduler {
  config: TestSchedulerConfig,
  clock:  Arc<AtomicU64>,
  state:  Arc<Mutex<SchedulerState>>,
}

impl TestScheduler {
  /// Creates a scheduler at frame zero.
  #[must_use]
  pub fn new(config: TestSchedulerConfig) -> Self {
    let state = SchedulerState { sequence: 0, queue: BTreeMap::new(), hot_setups: Vec::new() };
    Self { config, clock: Arc::new(AtomicU64::new(0)), state: Arc::new(Mutex::new(state)) }
  }

  /// Returns the configuration.
  #[must_use]
  pub const fn config(&self) -> &TestSchedulerConfig {
    &self.config
  }

  /// Returns the current virtual frame.
  #[must_use]
  pub fn now(&self) -> u64 {
    self.clock.load(Ordering::Acquire)
  }

  /// Schedules `action` to run `delay` frames from now.
  pub fn schedule<F>(&self, delay: u64, action: F)
  where
    F: FnOnce() + Send + 'static, {
    self.schedule_at(self.now().saturating_add(delay), Box::new(action));
  }

  fn schedule_at(&self, frame: u64, action: ScheduledAction) {
    let mut state = self.state.lock();
    let sequence = state.sequence;
    state.sequence += 1;
    state.queue.insert((frame, sequence), action);
  }

  /// Runs every scheduled action in virtual-time order.
  ///
  /// Hot producers are set up first. Actions scheduled past the configured `max_frames` are
  /// dropped.
  pub fn flush(&self) {
    let setups = core::mem::take(&mut self.state.lock().hot_setups);
    for setup in setups {
      setup();
    }
    loop {
      let action = {
        let mut state = self.state.lock();
        match state.queue.pop_first() {
          | None => None,
          | Some(((frame, _), _)) if frame > self.config.max_frames() => {
            let dropped = state.queue.len() + 1;
            state.queue.clear();
            tracing::warn!(
              target: LOG_TARGET,
              dropped,
              max_frames = self.config.max_frames(),
              "virtual time limit reached; scheduled actions dropped"
            );
            None
          },
          | Some(((frame, _), action)) => {
            self.clock.store(frame, Ordering::Release);
            Some(action)
          },
        }
      };
      match action {
        | Some(action) => action(),
        | None => break,
      }
    }
  }

  /// Creates a hot producer from a marble diagram.
  ///
  /// Signals are emitted at their frame, relative to the `^` marker, to whoever is subscribed at
  /// that moment. Signals before `^` are never observed.
  ///
  /// # Errors
  ///
  /// Returns a [`MarbleError`] when the diagram is malformed.
  pub fn hot<T, R>(&self, marbles: &str, resolve: R) -> Result<TestProducer<T>, MarbleError>
  where
    T: Clone + Send + Sync + 'static,
    R: Fn(char) -> Option<T>, {
    let signals = parse_signals(marbles, resolve, &self.config, true)?;
    let subscribers: Arc<Mutex<Vec<Consumer<T>>>> = Arc::new(Mutex::new(Vec::new()));
    let subscriptions = Arc::new(Mutex::new(Vec::new()));

    let scheduler = self.clone();
    let targets = subscribers.clone();
    let setup: ScheduledAction = Box::new(move || {
      for recorded in signals {
        let frame = recorded.frame().max(scheduler.now());
        let targets = targets.clone();
        let signal = recorded.into_signal();
        scheduler.schedule_at(
          frame,
          Box::new(move || {
            let current = targets.lock().clone();
            for consumer in current {
              consumer.deliver(signal.clone());
            }
          }),
        );
      }
    });
    self.state.lock().hot_setups.push(setup);

    let clock = self.clock.clone();
    let log = subscriptions.clone();
    let producer = Producer::new(move |consumer: &Consumer<T>| {
      track_subscription(&clock, &log, consumer);
      subscribers.lock().push(consumer.clone());
      Ok(())
    });
    Ok(TestProducer::new(producer, subscriptions))
  }

  /// Creates a cold producer from a marble diagram.
  ///
  /// Every subscription replays the diagram with frames relative to the subscription frame.
  ///
  /// # Errors
  ///
  /// Returns a [`MarbleError`] when the diagram is malformed or contains `^`.
  pub fn cold<T, R>(&self, marbles: &str, resolve: R) -> Result<TestProducer<T>, MarbleError>
  where
    T: Clone + Send + Sync + 'static,
    R: Fn(char) -> Option<T>, {
    let signals = parse_signals(marbles, resolve, &self.config, false)?;
    let subscriptions = Arc::new(Mutex::new(Vec::new()));

    let scheduler = self.clone();
    let log = subscriptions.clone();
    let producer = Producer::new(move |consumer: &Consumer<T>| {
      track_subscription(&scheduler.clock, &log, consumer);
      for recorded in &signals {
        let target = consumer.clone();
        let signal = recorded.signal().clone();
        scheduler.schedule(recorded.frame(), move || target.deliver(signal));
      }
      Ok(())
    });
    Ok(TestProducer::new(producer, subscriptions))
  }

  /// Subscribes to `producer` during the next flush and records every signal with its frame.
  ///
  /// `unsubscription` may place `^` to delay the subscription and `!` to cancel it.
  ///
  /// # Errors
  ///
  /// Returns a [`MarbleError`] when `unsubscription` is malformed.
  pub fn record<T>(&self, producer: &Producer<T>, unsubscription: Option<&str>) -> Result<Observation<T>, MarbleError>
  where
    T: Send + 'static, {
    let (subscribe_frame, unsubscribe_frame) = match unsubscription {
      | Some(marbles) => parse_subscription_frames(marbles, &self.config)?,
      | None => (None, None),
    };
    let signals = Arc::new(Mutex::new(Vec::new()));
    let registry = Arc::new(Mutex::new(None));

    let producer = producer.clone();
    let clock = self.clock.clone();
    let recorded = signals.clone();
    let active = registry.clone();
    self.schedule_at(
      subscribe_frame.unwrap_or(0),
      Box::new(move || {
        let consumer = Consumer::new(recording_handler(&clock, &recorded));
        *active.lock() = Some(producer.subscribe(consumer));
      }),
    );
    if let Some(frame) = unsubscribe_frame {
      self.schedule_at(
        frame,
        Box::new(move || {
          if let Some(registry) = registry.lock().take() {
            registry.dispose();
          }
        }),
      );
    }
    Ok(Observation::new(signals))
  }

  /// Parses the signals an observation is expected to record.
  ///
  /// # Errors
  ///
  /// Returns a [`MarbleError`] when the diagram is malformed.
  pub fn expected<T, R>(&self, marbles: &str, resolve: R) -> Result<Vec<Recorded<T>>, MarbleError>
  where
    R: Fn(char) -> Option<T>, {
    parse_signals(marbles, resolve, &self.config, false)
  }

  /// Parses the subscription a test producer is expected to log.
  ///
  /// # Errors
  ///
  /// Returns [`MarbleError::MissingSubscription`] when the diagram has no `^`, or another
  /// [`MarbleError`] when it is malformed.
  pub fn expected_subscription(&self, marbles: &str) -> Result<SubscriptionLog, MarbleError> {
    match parse_subscription_frames(marbles, &self.config)? {
      | (Some(subscribed), unsubscribed) => Ok(SubscriptionLog::new(subscribed, unsubscribed)),
      | (None, _) => Err(MarbleError::MissingSubscription),
    }
  }
}

impl Default for TestScheduler {
  fn default() -> Self {
    Self::new(TestSchedulerConfig::default())
  }
}

impl core::fmt::Debug for TestScheduler {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let state = self.state.lock();
    f.debug_struct("TestScheduler")
      .field("now", &self.now())
      .field("pending", &state.queue.len())
      .field("hot_setups", &state.hot_setups.len())
      .finish()
  }
}

struct SchedulerState {
  sequence:   u64,
  queue:      BTreeMap<(u64, u64), ScheduledAction>,
  hot_setups: Vec<ScheduledAction>,
}

fn track_subscription<T>(clock: &Arc<AtomicU64>, log: &Arc<Mutex<Vec<SubscriptionLog>>>, consumer: &Consumer<T>) {
  let index = {
    let mut entries = log.lock();
    entries.push(SubscriptionLog::new(clock.load(Ordering::Acquire), None));
    entries.len() - 1
  };
  let clock = clock.clone();
  let log = log.clone();
  consumer.add_teardown(move || {
    if let Some(entry) = log.lock().get_mut(index) {
      entry.close(clock.load(Ordering::Acquire));
    }
  });
}

fn recording_handler<T>(clock: &Arc<AtomicU64>, signals: &Arc<Mutex<Vec<Recorded<T>>>>) -> CallbackHandler<T>
where
  T: Send + 'static, {
  let (next_clock, next_signals) = (clock.clone(), signals.clone());
  let (error_clock, error_signals) = (clock.clone(), signals.clone());
  let (complete_clock, complete_signals) = (clock.clone(), signals.clone());
  CallbackHandler::new(move |value| {
    next_signals.lock().push(Recorded::new(next_clock.load(Ordering::Acquire), Signal::Next(value)));
  })
  .with_error(move |error| {
    error_signals.lock().push(Recorded::new(error_clock.load(Ordering::Acquire), Signal::Error(error)));
  })
  .with_complete(move || {
    complete_signals.lock().push(Recorded::new(complete_clock.load(Ordering::Acquire), Signal::Complete));
  })
}

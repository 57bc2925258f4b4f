extern crate std;

use alloc::{sync::Arc, vec, vec::Vec};
use std::sync::Mutex;

use super::TestScheduler;
use crate::core::{
  StreamError,
  stage::{Producer, Signal},
  testing::{MarbleError, Recorded, SubscriptionLog, TestSchedulerConfig},
};

fn letters(marker: char) -> Option<char> {
  marker.is_ascii_alphabetic().then_some(marker)
}

#[test]
fn actions_run_by_frame_then_by_schedule_order() {
  let scheduler = TestScheduler::default();
  let log = Arc::new(Mutex::new(Vec::new()));
  for (delay, label) in [(3, "late"), (1, "early"), (3, "late-second"), (0, "now")] {
    let log = log.clone();
    let clock = scheduler.clone();
    scheduler.schedule(delay, move || log.lock().expect("lock").push((clock.now(), label)));
  }

  scheduler.flush();

  assert_eq!(*log.lock().expect("lock"), vec![(0, "now"), (1, "early"), (3, "late"), (3, "late-second")]);
  assert_eq!(scheduler.now(), 3);
}

#[test]
fn actions_scheduled_while_flushing_are_relative_to_now() {
  let scheduler = TestScheduler::default();
  let log = Arc::new(Mutex::new(Vec::new()));
  let inner = scheduler.clone();
  let shared = log.clone();
  scheduler.schedule(2, move || {
    let clock = inner.clone();
    inner.schedule(3, move || shared.lock().expect("lock").push(clock.now()));
  });

  scheduler.flush();

  assert_eq!(*log.lock().expect("lock"), vec![5]);
}

#[test]
fn actions_past_max_frames_are_dropped() {
  let scheduler = TestScheduler::new(TestSchedulerConfig::default().with_max_frames(10));
  let log = Arc::new(Mutex::new(Vec::new()));
  for delay in [5, 10, 11, 20] {
    let log = log.clone();
    scheduler.schedule(delay, move || log.lock().expect("lock").push(delay));
  }

  scheduler.flush();

  assert_eq!(*log.lock().expect("lock"), vec![5, 10]);
  assert_eq!(scheduler.now(), 10);
}

#[test]
fn cold_producer_replays_relative_to_each_subscription() {
  let scheduler = TestScheduler::default();
  let source = scheduler.cold("-a|", letters).expect("cold");
  let first = scheduler.record(&source.producer(), None).expect("record");
  let second = scheduler.record(&source.producer(), Some("---^")).expect("record");

  scheduler.flush();

  assert_eq!(first.signals(), vec![Recorded::new(1, Signal::Next('a')), Recorded::new(2, Signal::Complete)]);
  assert_eq!(second.signals(), vec![Recorded::new(4, Signal::Next('a')), Recorded::new(5, Signal::Complete)]);
  assert_eq!(source.subscriptions(), vec![SubscriptionLog::new(0, Some(2)), SubscriptionLog::new(3, Some(5))]);
}

#[test]
fn hot_producer_only_emits_to_current_subscribers() {
  let scheduler = TestScheduler::default();
  let source = scheduler.hot("-a-^-b-c-|", letters).expect("hot");
  let early = scheduler.record(&source.producer(), None).expect("record");
  let late = scheduler.record(&source.producer(), Some("---^")).expect("record");

  scheduler.flush();

  assert_eq!(early.signals(), vec![
    Recorded::new(2, Signal::Next('b')),
    Recorded::new(4, Signal::Next('c')),
    Recorded::new(6, Signal::Complete),
  ]);
  assert_eq!(late.signals(), vec![Recorded::new(4, Signal::Next('c')), Recorded::new(6, Signal::Complete)]);
  assert_eq!(source.subscriptions(), vec![SubscriptionLog::new(0, Some(6)), SubscriptionLog::new(3, Some(6))]);
}

#[test]
fn unsubscription_marker_cancels_the_recording() {
  let scheduler = TestScheduler::default();
  let source = scheduler.hot("--a--b--c--|", letters).expect("hot");
  let observation = scheduler.record(&source.producer(), Some("^    !")).expect("record");

  scheduler.flush();

  assert_eq!(observation.signals(), vec![Recorded::new(2, Signal::Next('a'))]);
  assert_eq!(source.subscriptions(), vec![scheduler.expected_subscription("^    !").expect("subscription")]);
}

#[test]
fn hash_marker_delivers_the_configured_error() {
  let scheduler = TestScheduler::default();
  let source = scheduler.cold::<char, _>("--#", letters).expect("cold");
  let observation = scheduler.record(&source.producer(), None).expect("record");

  scheduler.flush();

  assert_eq!(observation.signals(), vec![Recorded::new(2, Signal::Error(StreamError::failed_with("error")))]);
  assert_eq!(source.subscriptions(), vec![SubscriptionLog::new(0, Some(2))]);
}

#[test]
fn synchronous_producers_record_at_the_subscription_frame() {
  let scheduler = TestScheduler::default();
  let observation = scheduler.record(&Producer::from_iterator(['x', 'y']), Some("--^")).expect("record");

  scheduler.flush();

  assert_eq!(observation.signals(), scheduler.expected("--(xy|)", letters).expect("expected"));
}

#[test]
fn expected_subscription_requires_a_subscription_point() {
  let scheduler = TestScheduler::default();
  assert_eq!(scheduler.expected_subscription("---!"), Err(MarbleError::MissingSubscription));
  assert_eq!(scheduler.expected_subscription("-^-!"), Ok(SubscriptionLog::new(1, Some(3))));
}

#[test]
fn malformed_diagrams_are_reported_before_flushing() {
  let scheduler = TestScheduler::default();
  assert_eq!(scheduler.cold::<char, _>("-(a", letters).err(), Some(MarbleError::UnclosedGroup));
  assert_eq!(scheduler.hot::<char, _>("^-^", letters).err(), Some(MarbleError::DuplicateSubscription));
  assert_eq!(
    scheduler.record(&Producer::<char>::never(), Some("^!!")).err(),
    Some(MarbleError::DuplicateUnsubscription)
  );
}

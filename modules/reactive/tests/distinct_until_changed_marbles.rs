use std::sync::{Arc, Mutex};

use fraktor_reactive_rs::core::{
  StreamError,
  stage::Producer,
  testing::{TestProducer, TestScheduler},
};

fn letters(marker: char) -> Option<char> {
  marker.is_ascii_lowercase().then_some(marker)
}

fn digits(marker: char) -> Option<u32> {
  marker.to_digit(10)
}

fn ordinals(marker: char) -> Option<u32> {
  "abcdef".find(marker).map(|index| index as u32 + 1)
}

fn comparator_failure() -> StreamError {
  StreamError::failed_with("error")
}

struct MarbleCase {
  scheduler: TestScheduler,
}

impl MarbleCase {
  fn new() -> Self {
    Self { scheduler: TestScheduler::default() }
  }

  fn hot(&self, marbles: &str) -> TestProducer<char> {
    self.scheduler.hot(marbles, letters).expect("hot marbles")
  }

  fn cold(&self, marbles: &str) -> TestProducer<char> {
    self.scheduler.cold(marbles, letters).expect("cold marbles")
  }

  fn assert_output<T, R>(&self, result: &Producer<T>, unsubscription: Option<&str>, expected: &str, resolve: R)
  where
    T: Clone + Send + core::fmt::Debug + PartialEq + 'static,
    R: Fn(char) -> Option<T>, {
    let observation = self.scheduler.record(result, unsubscription).expect("unsubscription marbles");
    self.scheduler.flush();
    assert_eq!(observation.signals(), self.scheduler.expected(expected, resolve).expect("expected marbles"));
  }

  fn assert_subscriptions<T>(&self, source: &TestProducer<T>, expected: &str) {
    let expected = self.scheduler.expected_subscription(expected).expect("subscription marbles");
    assert_eq!(source.subscriptions(), vec![expected]);
  }
}

#[test]
fn distinguishes_between_numeric_values() {
  let case = MarbleCase::new();
  let source = case.scheduler.hot("-1--2-2----1-3-|", digits).expect("hot marbles");
  case.assert_output(&source.producer().distinct_until_changed(), None, "-1--2------1-3-|", digits);
}

#[test]
fn distinguishes_between_values() {
  let case = MarbleCase::new();
  let source = case.hot("--a--a--a--b--b--a--|");
  case.assert_output(&source.producer().distinct_until_changed(), None, "--a--------b-----a--|", letters);
  case.assert_subscriptions(&source, "^                   !");
}

#[test]
fn distinguishes_between_values_without_completing() {
  let case = MarbleCase::new();
  let source = case.hot("--a--a--a--b--b--a-");
  case.assert_output(&source.producer().distinct_until_changed(), None, "--a--------b-----a-", letters);
  case.assert_subscriptions(&source, "^                  ");
}

#[test]
fn does_not_complete_when_cold_source_never_completes() {
  let case = MarbleCase::new();
  let source = case.cold("-");
  case.assert_output(&source.producer().distinct_until_changed(), None, "-", letters);
  case.assert_subscriptions(&source, "^");
}

#[test]
fn does_not_complete_when_hot_source_does_not_complete() {
  let case = MarbleCase::new();
  let source = case.hot("-");
  case.assert_output(&source.producer().distinct_until_changed(), None, "-", letters);
  case.assert_subscriptions(&source, "^");
}

#[test]
fn completes_when_source_is_empty() {
  let case = MarbleCase::new();
  let source = case.cold("|");
  case.assert_output(&source.producer().distinct_until_changed(), None, "|", letters);
  case.assert_subscriptions(&source, "(^!)");
}

#[test]
fn completes_when_source_does_not_emit() {
  let case = MarbleCase::new();
  let source = case.hot("------|");
  case.assert_output(&source.producer().distinct_until_changed(), None, "------|", letters);
  case.assert_subscriptions(&source, "^     !");
}

#[test]
fn emits_a_single_element_source() {
  let case = MarbleCase::new();
  let source = case.hot("--a--|");
  case.assert_output(&source.producer().distinct_until_changed(), None, "--a--|", letters);
  case.assert_subscriptions(&source, "^    !");
}

#[test]
fn emits_a_scalar_source() {
  let case = MarbleCase::new();
  case.assert_output(&Producer::single('a').distinct_until_changed(), None, "(a|)", letters);
}

#[test]
fn forwards_source_errors() {
  let case = MarbleCase::new();
  let source = case.hot("--a--a--#");
  case.assert_output(&source.producer().distinct_until_changed(), None, "--a-----#", letters);
  case.assert_subscriptions(&source, "^       !");
}

#[test]
fn forwards_immediate_source_errors() {
  let case = MarbleCase::new();
  let source = case.cold("#");
  case.assert_output(&source.producer().distinct_until_changed(), None, "#", letters);
  case.assert_subscriptions(&source, "(^!)");
}

#[test]
fn keeps_all_elements_when_all_differ() {
  let case = MarbleCase::new();
  let source = case.hot("--a--b--c--d--e--f--|");
  case.assert_output(&source.producer().distinct_until_changed(), None, "--a--b--c--d--e--f--|", letters);
  case.assert_subscriptions(&source, "^                   !");
}

#[test]
fn stops_when_unsubscribed_early() {
  let case = MarbleCase::new();
  let source = case.hot("--a--b--b--d--a--f--|");
  let unsubscription = "          !          ";
  case.assert_output(
    &source.producer().distinct_until_changed(),
    Some(unsubscription),
    "--a--b-----          ",
    letters,
  );
  case.assert_subscriptions(&source, "^         !          ");
}

#[test]
fn keeps_the_unsubscription_chain_through_merge_map() {
  let case = MarbleCase::new();
  let source = case.hot("--a--b--b--d--a--f--|");
  let result = source.producer().merge_map(Producer::single).distinct_until_changed().merge_map(Producer::single);
  case.assert_output(&result, Some("          !          "), "--a--b-----          ", letters);
  case.assert_subscriptions(&source, "^         !          ");
}

#[test]
fn emits_once_when_all_elements_are_equal() {
  let case = MarbleCase::new();
  let source = case.hot("--a--a--a--a--a--a--|");
  case.assert_output(&source.producer().distinct_until_changed(), None, "--a-----------------|", letters);
  case.assert_subscriptions(&source, "^                   !");
}

#[test]
fn emits_once_when_comparator_always_matches() {
  let case = MarbleCase::new();
  let source = case.hot("--a--b--c--d--e--f--|");
  let result = source.producer().distinct_until_changed_by(|_, _| Ok(true));
  case.assert_output(&result, None, "--a-----------------|", letters);
  case.assert_subscriptions(&source, "^                   !");
}

#[test]
fn emits_everything_when_comparator_never_matches() {
  let case = MarbleCase::new();
  let source = case.hot("--a--a--a--a--a--a--|");
  let result = source.producer().distinct_until_changed_by(|_, _| Ok(false));
  case.assert_output(&result, None, "--a--a--a--a--a--a--|", letters);
  case.assert_subscriptions(&source, "^                   !");
}

#[test]
fn distinguishes_values_by_comparator() {
  let case = MarbleCase::new();
  let source = case.scheduler.hot("--a--b--c--d--e--f--|", ordinals).expect("hot marbles");
  let result = source.producer().distinct_until_changed_by(|_, current| Ok(current % 2 == 0));
  case.assert_output(&result, None, "--a-----c-----e-----|", ordinals);
  case.assert_subscriptions(&source, "^                   !");
}

#[test]
fn fails_when_comparator_fails() {
  let case = MarbleCase::new();
  let source = case.hot("--a--b--c--d--e--f--|");
  let result = source.producer().distinct_until_changed_by(|previous, current| {
    if *current == 'd' {
      return Err(comparator_failure());
    }
    Ok(previous == current)
  });
  case.assert_output(&result, None, "--a--b--c--#         ", letters);
  case.assert_subscriptions(&source, "^          !         ");
}

#[test]
fn compares_selected_keys() {
  let case = MarbleCase::new();
  let source = case.scheduler.hot("--a--b--c--d--e--f--|", ordinals).expect("hot marbles");
  let result = source.producer().distinct_until_changed_with(
    fraktor_reactive_rs::core::operator::DistinctUntilChanged::by_key_comparing(
      |value: &u32| Ok(value % 2),
      |_, current| Ok(current % 2 == 1),
    ),
  );
  case.assert_output(&result, None, "--a--b-----d-----f--|", ordinals);
  case.assert_subscriptions(&source, "^                   !");
}

#[test]
fn fails_when_key_selector_fails() {
  let case = MarbleCase::new();
  let source = case.hot("--a--b--c--d--e--f--|");
  let result = source.producer().distinct_until_changed_by_key(|value: &char| {
    if *value == 'd' {
      return Err(comparator_failure());
    }
    Ok(*value)
  });
  case.assert_output(&result, None, "--a--b--c--#         ", letters);
  case.assert_subscriptions(&source, "^          !         ");
}

#[test]
fn stops_a_synchronous_source_once_take_is_satisfied() {
  let side_effects = Arc::new(Mutex::new(Vec::new()));
  let effects = side_effects.clone();
  let synchronous = Producer::new(move |consumer| {
    let mut index = 0_u32;
    while !consumer.is_closed() && index < 10 {
      effects.lock().expect("lock").push(index);
      consumer.next(index);
      index += 1;
    }
    Ok(())
  });

  let _registry = synchronous.distinct_until_changed().take(3).subscribe_fn(|_| {});

  assert_eq!(*side_effects.lock().expect("lock"), vec![0, 1, 2]);
}

use alloc::{sync::Arc, vec::Vec};

use spin::Mutex;

use super::{Producer, SubscriptionLog};

/// Marble-driven producer that logs when it is subscribed and unsubscribed.
pub struct TestProducer<T> {
  producer:      Producer<T>,
  subscriptions: Arc<Mutex<Vec<SubscriptionLog>>>,
}

impl<T> TestProducer<T> {
  pub(super) fn new(producer: Producer<T>, subscriptions: Arc<Mutex<Vec<SubscriptionLog>>>) -> Self {
    Self { producer, subscriptions }
  }

  /// Returns the producer to compose operators on.
  #[must_use]
  pub fn producer(&self) -> Producer<T> {
    self.producer.clone()
  }

  /// Returns the subscription log, one entry per subscription in subscription order.
  #[must_use]
  pub fn subscriptions(&self) -> Vec<SubscriptionLog> {
    self.subscriptions.lock().clone()
  }
}

impl<T> Clone for TestProducer<T> {
  fn clone(&self) -> Self {
    Self { producer: self.producer.clone(), subscriptions: self.subscriptions.clone() }
  }
}

/// Virtual frames at which a test producer was subscribed and unsubscribed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionLog {
  subscribed_frame:   u64,
  unsubscribed_frame: Option<u64>,
}

impl SubscriptionLog {
  /// Creates a log entry. `None` means the subscription is still active.
  #[must_use]
  pub const fn new(subscribed_frame: u64, unsubscribed_frame: Option<u64>) -> Self {
    Self { subscribed_frame, unsubscribed_frame }
  }

  /// Returns the frame the subscription started at.
  #[must_use]
  pub const fn subscribed_frame(&self) -> u64 {
    self.subscribed_frame
  }

  /// Returns the frame the subscription was torn down at.
  #[must_use]
  pub const fn unsubscribed_frame(&self) -> Option<u64> {
    self.unsubscribed_frame
  }

  pub(super) fn close(&mut self, frame: u64) {
    if self.unsubscribed_frame.is_none() {
      self.unsubscribed_frame = Some(frame);
    }
  }
}

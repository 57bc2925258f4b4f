use super::StreamError;


/// Configuration for [`TestScheduler`](super::TestScheduler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSchedulerConfig {
  frame_time_factor: u64,
  max_frames:        u64,
  error_value:       StreamError,
}

impl TestSchedulerConfig {
  /// Creates a new configuration with defaults.
  #[must_use]
  pub fn new() -> Self {
    Self { frame_time_factor: 1, max_frames: 750, error_value: StreamError::failed_with("error") }
  }

  /// Returns the number of virtual frames one marble character spans.
  #[must_use]
  pub const fn frame_time_factor(&self) -> u64 {
    self.frame_time_factor
  }

  /// Returns the last virtual frame the scheduler runs actions at.
  #[must_use]
  pub const fn max_frames(&self) -> u64 {
    self.max_frames
  }

  /// Returns the error a `#` marker stands for.
  #[must_use]
  pub const fn error_value(&self) -> &StreamError {
    &self.error_value
  }

  /// Updates the frame time factor. Zero is raised to one.
  #[must_use]
  pub fn with_frame_time_factor(mut self, frame_time_factor: u64) -> Self {
    self.frame_time_factor = frame_time_factor.max(1);
    self
  }

  /// Updates the last frame actions run at.
  #[must_use]
  pub const fn with_max_frames(mut self, max_frames: u64) -> Self {
    self.max_frames = max_frames;
    self
  }

  /// Updates the error a `#` marker stands for.
  #[must_use]
  pub fn with_error_value(mut self, error_value: StreamError) -> Self {
    self.error_value = error_value;
    self
  }
}

impl Default for TestSchedulerConfig {
  fn default() -> Self {
    Self::new()
  }
}

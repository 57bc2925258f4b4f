//! Virtual-time test utilities for marble-diagram driven stream verification.

// Bridge imports for children
use super::{
  LOG_TARGET, StreamError,
  stage::{CallbackHandler, Consumer, Producer, Signal},
};

mod marble_error;
mod marble_parser;
mod observation;
mod recorded;
mod subscription_log;
mod test_producer;
mod test_scheduler;
mod test_scheduler_config;

pub use marble_error::MarbleError;
pub use observation::Observation;
pub use recorded::Recorded;
pub use subscription_log::SubscriptionLog;
pub use test_producer::TestProducer;
pub use test_scheduler::TestScheduler;
pub use test_scheduler_config::TestSchedulerConfig;

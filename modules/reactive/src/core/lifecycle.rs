//! Subscription lifecycle and cancellation.

// Bridge imports from core level for children
use super::{LOG_TARGET, StreamError};

mod teardown_registry;

pub use teardown_registry::{TeardownAction, TeardownRegistry};

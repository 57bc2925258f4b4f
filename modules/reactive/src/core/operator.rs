//! Built-in operators.
//!
//! Every operator is a [`Producer::lift`](super::stage::Producer::lift) whose transform builds a
//! fresh per-subscription handler. Operators that only pass signals on wrap it in a
//! [`Consumer::forwarding`](super::stage::Consumer::forwarding); operators that may end their
//! upstream early subscribe it under a child registry of the downstream one.

// Bridge imports from core level for children
use super::{
  StreamError,
  lifecycle::TeardownRegistry,
  stage::{Consumer, Producer, SignalHandler},
};

/// Consecutive-duplicate suppression.
mod distinct_until_changed;
/// Concurrent flattening of inner producers.
mod merge_map;
/// Bounded prefix.
mod take;

pub use distinct_until_changed::DistinctUntilChanged;

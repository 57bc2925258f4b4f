//! Producer and consumer definitions.

// Bridge types from core level for children
use super::{LOG_TARGET, StreamError, lifecycle::TeardownRegistry};

/// Closure-backed signal handler.
mod callback_handler;
/// Guarded signal sink.
mod consumer;
/// Deferred signal source.
mod producer;
/// Signal enum.
mod signal;
/// Signal handler trait.
mod signal_handler;

pub use callback_handler::CallbackHandler;
pub use consumer::Consumer;
pub use producer::Producer;
pub use signal::Signal;
pub use signal_handler::SignalHandler;

//! Core reactive primitives shared across runtimes.

/// Subscription lifecycle and teardown.
pub mod lifecycle;
/// Built-in operators.
pub mod operator;
/// Producer and consumer definitions.
pub mod stage;
/// Stream error definitions.
mod stream_error;
/// Virtual-time test utilities.
pub mod testing;

pub use stream_error::StreamError;

/// Tracing target used by every log event emitted from this crate.
pub(crate) const LOG_TARGET: &str = "fraktor::reactive";

//! Observability utilities.

mod spans;
mod subscriber;

pub use spans::SpanTimer;
pub use subscriber::{init_tracing, TracingConfig, DEFAULT_FILTER};

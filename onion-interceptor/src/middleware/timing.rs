//! Middleware that measures the inner chain.

use super::{Middleware, MiddlewareResult};
use crate::context::Context;
use crate::dispatch::Next;
use crate::observability::SpanTimer;
use async_trait::async_trait;

/// Default extension key for the measured duration.
pub const DEFAULT_TIMING_KEY: &str = "elapsed_ms";

/// Records how long the rest of the chain took, in milliseconds.
///
/// The duration is stored in the context extensions whether the inner chain
/// succeeded or failed.
#[derive(Debug, Clone)]
pub struct TimingMiddleware {
    key: String,
}

impl TimingMiddleware {
    /// Creates a timing middleware writing to `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Returns the extension key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Default for TimingMiddleware {
    fn default() -> Self {
        Self::new(DEFAULT_TIMING_KEY)
    }
}

#[async_trait]
impl Middleware for TimingMiddleware {
    fn name(&self) -> &str {
        "timing"
    }

    async fn handle(&self, ctx: &mut Context, next: Next) -> MiddlewareResult {
        let timer = SpanTimer::start(self.name(), ctx.id());
        let result = next.run(ctx).await;
        let elapsed_ms = timer.finish(result.is_ok());
        ctx.insert(self.key.clone(), elapsed_ms);

        result
    }
}

//! Middleware that logs each invocation.

use super::{Middleware, MiddlewareResult};
use crate::context::Context;
use crate::dispatch::Next;
use async_trait::async_trait;
use tracing::{info, warn};

/// Logs the start and end of every invocation passing through it.
///
/// Results and errors are passed through untouched.
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    label: String,
}

impl LoggingMiddleware {
    /// Creates a logging middleware with the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Returns the label attached to log lines.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new("logging")
    }
}

#[async_trait]
impl Middleware for LoggingMiddleware {
    fn name(&self) -> &str {
        &self.label
    }

    async fn handle(&self, ctx: &mut Context, next: Next) -> MiddlewareResult {
        info!(
            label = %self.label,
            invocation_id = %ctx.id(),
            args = ?ctx.args,
            "interceptor start"
        );

        let result = next.run(ctx).await;

        match &result {
            Ok(value) => info!(
                label = %self.label,
                invocation_id = %ctx.id(),
                has_response = ctx.has_response(),
                explicit_return = value.is_some(),
                "interceptor end"
            ),
            Err(err) => warn!(
                label = %self.label,
                invocation_id = %ctx.id(),
                error = %err,
                "interceptor failed"
            ),
        }

        result
    }
}

//! Reusable operations for injection through [`Next::run_with`].
//!
//! [`Next::run_with`]: crate::dispatch::Next::run_with

use crate::context::Context;
use crate::dispatch::Next;
use crate::middleware::{Middleware, MiddlewareResult, Operation};
use async_trait::async_trait;

struct Finalize<F> {
    callback: F,
}

#[async_trait]
impl<F> Middleware for Finalize<F>
where
    F: Fn() + Send + Sync,
{
    fn name(&self) -> &str {
        "finalize"
    }

    async fn handle(&self, ctx: &mut Context, next: Next) -> MiddlewareResult {
        let result = next.run(ctx).await;
        (self.callback)();
        result
    }
}

/// Creates an operation that calls `callback` once the rest of the chain
/// settles, whether it succeeded or failed.
///
/// ```rust,ignore
/// let loading = from_fn(move |ctx, next| {
///     Box::pin(async move {
///         spinner.show();
///         next.run_with(ctx, [finalize(move || spinner.hide())]).await
///     })
/// });
/// ```
pub fn finalize<F>(callback: F) -> Operation
where
    F: Fn() + Send + Sync + 'static,
{
    Operation::new(Finalize { callback })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::compose;
    use crate::errors::InterceptorError;
    use crate::middleware::from_fn;
    use crate::testing::EventLog;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn injecting(log: &EventLog) -> Arc<dyn Middleware> {
        let log = log.clone();
        Arc::new(from_fn(move |ctx, next| {
            let log = log.clone();
            Box::pin(async move {
                log.push("interceptor start");
                let done = log.clone();
                next.run_with(ctx, [finalize(move || done.push("interceptor end"))])
                    .await
            })
        }))
    }

    #[tokio::test]
    async fn test_finalize_runs_after_success() {
        let log = EventLog::new();
        let inner = {
            let log = log.clone();
            Arc::new(from_fn(move |_ctx, _next| {
                let log = log.clone();
                Box::pin(async move {
                    log.push("request");
                    MiddlewareResult::Ok(None)
                })
            })) as Arc<dyn Middleware>
        };
        let pipeline = compose(vec![injecting(&log), inner]);

        let mut ctx = Context::empty();
        pipeline.dispatch(&mut ctx).await.unwrap();

        assert_eq!(
            log.entries(),
            vec!["interceptor start", "request", "interceptor end"]
        );
    }

    #[tokio::test]
    async fn test_finalize_runs_after_error() {
        let log = EventLog::new();
        let failing: Arc<dyn Middleware> = Arc::new(from_fn(|_ctx, _next| {
            Box::pin(async move { MiddlewareResult::Err(InterceptorError::operation("timeout")) })
        }));
        let pipeline = compose(vec![injecting(&log), failing]);

        let mut ctx = Context::empty();
        let err = pipeline.dispatch(&mut ctx).await.unwrap_err();

        assert_eq!(err.to_string(), "timeout");
        assert_eq!(log.entries(), vec!["interceptor start", "interceptor end"]);
    }

    #[test]
    fn test_finalize_name() {
        let op = finalize(|| {});
        assert_eq!(op.name(), "finalize");
    }

    #[test]
    fn test_finalize_without_inner_stages() {
        let log = EventLog::new();
        let pipeline = compose(vec![injecting(&log)]);

        let mut ctx = Context::empty();
        let result = tokio_test::block_on(pipeline.dispatch(&mut ctx));

        assert!(result.unwrap().is_none());
        assert_eq!(log.entries(), vec!["interceptor start", "interceptor end"]);
    }
}

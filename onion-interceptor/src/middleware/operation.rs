//! Operations: middleware that may be injected through a continuation.

use super::{from_fn, BoxFuture, Middleware, MiddlewareResult};
use crate::context::Context;
use crate::dispatch::Next;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// A middleware marked as safe to splice into a running chain.
///
/// Only values of this type are accepted by [`Next::run_with`], so an
/// ordinary middleware can never be mistaken for an injected stage.
#[derive(Clone)]
pub struct Operation {
    inner: Arc<dyn Middleware>,
}

impl Operation {
    /// Marks a middleware as an operation.
    pub fn new(middleware: impl Middleware + 'static) -> Self {
        Self {
            inner: Arc::new(middleware),
        }
    }

    /// Marks a shared middleware as an operation.
    #[must_use]
    pub fn from_shared(middleware: Arc<dyn Middleware>) -> Self {
        Self { inner: middleware }
    }

    /// Returns the wrapped middleware's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub(crate) fn into_stage(self) -> Arc<dyn Middleware> {
        self.inner
    }
}

impl Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name())
            .finish()
    }
}

#[async_trait]
impl Middleware for Operation {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn handle(&self, ctx: &mut Context, next: Next) -> MiddlewareResult {
        self.inner.handle(ctx, next).await
    }
}

/// Creates an operation from a closure.
///
/// ```rust,ignore
/// let mark = operate(|ctx, next| {
///     Box::pin(async move {
///         ctx.insert("marked", true);
///         next.run(ctx).await
///     })
/// });
/// next.run_with(ctx, [mark]).await
/// ```
pub fn operate<F>(func: F) -> Operation
where
    F: for<'a> Fn(&'a mut Context, Next) -> BoxFuture<'a, MiddlewareResult>
        + Send
        + Sync
        + 'static,
{
    Operation::new(from_fn(func).named("operation"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::compose;
    use serde_json::json;

    #[test]
    fn test_operate_name() {
        let op = operate(|ctx, next| Box::pin(async move { next.run(ctx).await }));
        assert_eq!(op.name(), "operation");
    }

    #[test]
    fn test_operation_from_shared_keeps_name() {
        let mw: Arc<dyn Middleware> = Arc::new(
            from_fn(|ctx, next| Box::pin(async move { next.run(ctx).await })).named("tap"),
        );
        let op = Operation::from_shared(mw);
        assert_eq!(op.name(), "tap");
        assert!(format!("{op:?}").contains("tap"));
    }

    #[tokio::test]
    async fn test_operation_is_usable_as_plain_middleware() {
        let op = operate(|ctx, next| {
            Box::pin(async move {
                ctx.insert("seen", true);
                next.run(ctx).await
            })
        });

        let pipeline = compose(vec![Arc::new(op) as Arc<dyn Middleware>]);
        let mut ctx = Context::empty();
        pipeline.dispatch(&mut ctx).await.unwrap();

        assert_eq!(ctx.get("seen"), Some(&json!(true)));
    }
}

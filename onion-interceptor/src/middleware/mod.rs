//! Middleware trait and built-in middleware.
//!
//! A middleware wraps the rest of the chain: it runs code, hands control to
//! the next layer through [`Next`], and runs more code once every inner layer
//! has finished.

mod logging;
mod operation;
mod timing;

pub use logging::LoggingMiddleware;
pub use operation::{operate, Operation};
pub use timing::{TimingMiddleware, DEFAULT_TIMING_KEY};

use crate::context::Context;
use crate::dispatch::Next;
use crate::errors::InterceptorError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Boxed future returned by closure middleware and continuations.
pub type BoxFuture<'a, T> = futures::future::BoxFuture<'a, T>;

/// Outcome of a middleware.
///
/// `Ok(None)` means the middleware returned no explicit value.
pub type MiddlewareResult = Result<Option<serde_json::Value>, InterceptorError>;

/// Trait for pipeline middleware.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Returns the middleware's name, used in logs.
    fn name(&self) -> &str {
        "anonymous"
    }

    /// Handles one invocation.
    ///
    /// Call `next.run(ctx)` to continue the chain. Returning without calling
    /// it skips every inner stage, including the wrapped operation.
    async fn handle(&self, ctx: &mut Context, next: Next) -> MiddlewareResult;
}

/// A middleware built from a closure.
pub struct FnMiddleware<F> {
    name: String,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Next) -> BoxFuture<'a, MiddlewareResult> + Send + Sync,
{
    /// Sets the name reported in logs.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F> Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Next) -> BoxFuture<'a, MiddlewareResult> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, ctx: &mut Context, next: Next) -> MiddlewareResult {
        (self.func)(ctx, next).await
    }
}

/// Creates a middleware from a closure.
///
/// ```rust,ignore
/// let auth = from_fn(|ctx, next| {
///     Box::pin(async move {
///         ctx.insert("authorization", "Bearer token");
///         next.run(ctx).await
///     })
/// });
/// ```
pub fn from_fn<F>(func: F) -> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Next) -> BoxFuture<'a, MiddlewareResult> + Send + Sync,
{
    FnMiddleware {
        name: "anonymous".to_string(),
        func,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::compose;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_fn_middleware_name() {
        let mw = from_fn(|ctx, next| Box::pin(async move { next.run(ctx).await })).named("auth");
        assert_eq!(mw.name(), "auth");
    }

    #[test]
    fn test_debug_marks_closure_as_omitted() {
        let mw = from_fn(|ctx, next| Box::pin(async move { next.run(ctx).await })).named("auth");
        assert_eq!(format!("{mw:?}"), r#"FnMiddleware { name: "auth", .. }"#);
    }

    #[test]
    fn test_default_name() {
        let mw = from_fn(|ctx, next| Box::pin(async move { next.run(ctx).await }));
        assert_eq!(mw.name(), "anonymous");
    }

    #[tokio::test]
    async fn test_fn_middleware_mutates_context() {
        let mw: Arc<dyn Middleware> = Arc::new(from_fn(|ctx, next| {
            Box::pin(async move {
                ctx.insert("authorization", "Bearer token");
                next.run(ctx).await
            })
        }));

        let pipeline = compose(vec![mw]);
        let mut ctx = Context::empty();
        let result = pipeline.dispatch(&mut ctx).await.unwrap();

        assert!(result.is_none());
        assert_eq!(ctx.get("authorization"), Some(&json!("Bearer token")));
    }
}

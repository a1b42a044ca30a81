//! Client traits and the terminal stage that calls them.

use crate::context::Context;
use crate::dispatch::Next;
use crate::errors::InterceptorError;
use crate::middleware::{Middleware, MiddlewareResult};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// An axios-like client: something with a `request` method and defaults.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestClient: Send + Sync {
    /// Performs the operation with the raw call arguments.
    async fn request(&self, args: Vec<Value>) -> anyhow::Result<Value>;

    /// Returns the client's default configuration.
    fn defaults(&self) -> Value {
        Value::Null
    }
}

#[async_trait]
impl<C> RequestClient for Arc<C>
where
    C: RequestClient + ?Sized,
{
    async fn request(&self, args: Vec<Value>) -> anyhow::Result<Value> {
        (**self).request(args).await
    }

    fn defaults(&self) -> Value {
        (**self).defaults()
    }
}

/// A fetch-like client built from an async closure.
pub struct FnClient<F> {
    func: F,
    defaults: Value,
}

impl<F, Fut> FnClient<F>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send,
{
    /// Wraps `func` as a client with no defaults.
    pub fn new(func: F) -> Self {
        Self {
            func,
            defaults: Value::Null,
        }
    }

    /// Sets the defaults exposed to middleware as `ctx.cfg`.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.defaults = defaults;
        self
    }
}

impl<F> std::fmt::Debug for FnClient<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnClient")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> RequestClient for FnClient<F>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send,
{
    async fn request(&self, args: Vec<Value>) -> anyhow::Result<Value> {
        (self.func)(args).await
    }

    fn defaults(&self) -> Value {
        self.defaults.clone()
    }
}

/// Innermost stage: performs the real operation and records its result.
pub(crate) struct Terminal<C: ?Sized> {
    client: Arc<C>,
}

impl<C: RequestClient + ?Sized> Terminal<C> {
    pub(crate) fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C> Middleware for Terminal<C>
where
    C: RequestClient + ?Sized,
{
    fn name(&self) -> &str {
        "terminal"
    }

    async fn handle(&self, ctx: &mut Context, _next: Next) -> MiddlewareResult {
        let res = self
            .client
            .request(ctx.args.clone())
            .await
            .map_err(InterceptorError::Operation)?;
        ctx.res = Some(res);
        Ok(None)
    }
}

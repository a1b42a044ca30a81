//! Chain registries binding middleware to a client.
//!
//! An [`Interceptor`] owns the middleware registered against one client and
//! keeps a compiled [`Pipeline`] that ends in a terminal stage calling the
//! real client.
//!
//! ```rust,ignore
//! let mut interceptor = create_interceptor(client, true);
//! interceptor
//!     .add(ErrorInterceptor)
//!     .add(LoadingInterceptor)
//!     .add(AuthInterceptor);
//!
//! let http = interceptor.client();
//! let users = http.request(vec![json!("/users")]).await?;
//! ```


use crate::adapters::{execute, FnClient, InterceptedClient, PipelineSlot, RequestClient, Terminal};
use crate::catalog::{ChainConfig, MiddlewareCatalog};
use crate::context::Context;
use crate::dispatch::{compose, Pipeline};
use crate::errors::{ConfigError, InterceptorError};
use crate::middleware::{Middleware, MiddlewareResult};
use parking_lot::RwLock;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Registry of middleware for one client.
pub struct Interceptor<C: ?Sized> {
    client: Arc<C>,
    middlewares: Vec<Arc<dyn Middleware>>,
    pipeline: PipelineSlot,
    auto_patch: bool,
}

impl<C> Interceptor<C>
where
    C: RequestClient + ?Sized + 'static,
{
    /// Creates a registry for `client`.
    pub fn new(client: C, auto_patch: bool) -> Self
    where
        C: Sized,
    {
        Self::from_shared(Arc::new(client), auto_patch)
    }

    /// Creates a registry for a shared client.
    pub fn from_shared(client: Arc<C>, auto_patch: bool) -> Self {
        let pipeline = Arc::new(RwLock::new(Arc::new(Self::compile(&client, &[]))));
        Self {
            client,
            middlewares: Vec::new(),
            pipeline,
            auto_patch,
        }
    }

    /// Creates a registry from a declarative configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotCallable`] if a name is not in `catalog`.
    pub fn from_config(
        client: Arc<C>,
        catalog: &MiddlewareCatalog,
        config: &ChainConfig,
    ) -> Result<Self, ConfigError> {
        let mut interceptor = Self::from_shared(client, config.auto_patch_or(true));
        interceptor.apply_config(catalog, config)?;
        Ok(interceptor)
    }

    /// Appends the configured middleware. The auto-patch flag changes only
    /// if the configuration sets it; clients handed out earlier keep their
    /// mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotCallable`] if a name is not in `catalog`;
    /// the registry is left unchanged.
    pub fn apply_config(
        &mut self,
        catalog: &MiddlewareCatalog,
        config: &ChainConfig,
    ) -> Result<&mut Self, ConfigError> {
        self.add_named(catalog, &config.middleware)?;
        self.auto_patch = config.auto_patch_or(self.auto_patch);
        Ok(self)
    }

    fn compile(client: &Arc<C>, middlewares: &[Arc<dyn Middleware>]) -> Pipeline {
        let terminal: Arc<dyn Middleware> = Arc::new(Terminal::new(Arc::clone(client)));
        compose(middlewares.iter().cloned().chain(std::iter::once(terminal)))
    }

    fn rebuild(&mut self) {
        let pipeline = Self::compile(&self.client, &self.middlewares);
        debug!(
            middleware_count = self.middlewares.len(),
            stages = ?pipeline.stage_names(),
            "rebuilt interceptor pipeline"
        );
        *self.pipeline.write() = Arc::new(pipeline);
    }

    /// Appends a middleware.
    pub fn add(&mut self, middleware: impl Middleware + 'static) -> &mut Self {
        self.add_shared(Arc::new(middleware))
    }

    /// Appends a shared middleware.
    pub fn add_shared(&mut self, middleware: Arc<dyn Middleware>) -> &mut Self {
        self.middlewares.push(middleware);
        self.rebuild();
        self
    }

    /// Appends several middleware, in order.
    pub fn extend<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = Arc<dyn Middleware>>,
    {
        self.middlewares.extend(middlewares);
        self.rebuild();
        self
    }

    /// Appends middleware resolved by name from `catalog`.
    ///
    /// Nothing is appended if any name fails to resolve.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotCallable`] naming the first unknown entry.
    pub fn add_named<S: AsRef<str>>(
        &mut self,
        catalog: &MiddlewareCatalog,
        names: &[S],
    ) -> Result<&mut Self, ConfigError> {
        let resolved = catalog.build_chain(names)?;
        Ok(self.extend(resolved))
    }

    /// Returns the number of registered middleware, excluding the terminal.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns true if no middleware is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Returns whether this registry hands out a wrapped client.
    #[must_use]
    pub fn auto_patch(&self) -> bool {
        self.auto_patch
    }

    /// Returns the current compiled pipeline, terminal stage included.
    #[must_use]
    pub fn pipeline(&self) -> Arc<Pipeline> {
        self.pipeline.read().clone()
    }

    /// Returns the client callers should use.
    ///
    /// With auto-patch on this is the wrapped client; otherwise the raw one,
    /// and the pipeline is only reachable through [`run`](Self::run) and
    /// [`request`](Self::request).
    #[must_use]
    pub fn client(&self) -> Arc<dyn RequestClient> {
        if self.auto_patch {
            Arc::new(self.intercepted())
        } else {
            Arc::new(Arc::clone(&self.client))
        }
    }

    /// Returns a wrapped client regardless of the auto-patch flag.
    #[must_use]
    pub fn intercepted(&self) -> InterceptedClient<C> {
        InterceptedClient::new(Arc::clone(&self.client), Arc::clone(&self.pipeline))
    }

    /// Returns the unwrapped client.
    #[must_use]
    pub fn raw_client(&self) -> Arc<C> {
        Arc::clone(&self.client)
    }

    /// Dispatches a caller-built context through the pipeline.
    pub async fn run(&self, ctx: &mut Context) -> MiddlewareResult {
        let pipeline = self.pipeline();
        pipeline.dispatch(ctx).await
    }

    /// Performs one request through the pipeline.
    pub async fn request(&self, args: Vec<Value>) -> Result<Value, InterceptorError> {
        execute(self.pipeline(), self.client.defaults(), args).await
    }
}

impl<C: ?Sized> std::fmt::Debug for Interceptor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("middlewares", &self.middlewares.iter().map(|m| m.name()).collect::<Vec<_>>())
            .field("auto_patch", &self.auto_patch)
            .finish_non_exhaustive()
    }
}

/// Creates a registry bound to an axios-like client.
pub fn create_interceptor<C>(client: C, auto_patch: bool) -> Interceptor<C>
where
    C: RequestClient + 'static,
{
    Interceptor::new(client, auto_patch)
}

/// Creates a registry bound to a fetch-like function, with `middlewares`
/// already registered. An empty list gives a pass-through wrapper.
pub fn create_fetch_interceptor<F, Fut, I>(fetch: F, middlewares: I) -> Interceptor<FnClient<F>>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    I: IntoIterator<Item = Arc<dyn Middleware>>,
{
    let mut interceptor = Interceptor::new(FnClient::new(fetch), true);
    interceptor.extend(middlewares);
    interceptor
}

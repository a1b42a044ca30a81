//! # Onion Interceptor
//!
//! Onion-model middleware for request clients.
//!
//! Middleware registered on an [`Interceptor`] wrap a client's `request`
//! operation in registration order. Each layer runs its "before" code, hands
//! control inward through [`Next`], and runs its "after" code once every
//! inner layer has settled:
//!
//! ```text
//! error start -> loading start -> auth start -> request
//!             -> auth end -> loading end -> error end
//! ```
//!
//! A layer may also inject [`Operation`]s that run right inside it for the
//! current invocation only, or stop the chain early by not calling `next`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use onion_interceptor::prelude::*;
//!
//! let mut interceptor = create_interceptor(client, true);
//! interceptor.add(from_fn(|ctx, next| {
//!     Box::pin(async move {
//!         ctx.insert("authorization", "Bearer token");
//!         next.run(ctx).await
//!     })
//! }));
//!
//! let http = interceptor.client();
//! let users = http.request(vec![json!("/users")]).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod adapters;
pub mod catalog;
pub mod context;
pub mod dispatch;
pub mod errors;
pub mod interceptor;
pub mod middleware;
pub mod observability;
pub mod operators;
pub mod testing;

pub use adapters::{FnClient, InterceptedClient, RequestClient};
pub use context::Context;
pub use dispatch::{compose, Next, Pipeline};
pub use errors::{ConfigError, InterceptorError};
pub use interceptor::{create_fetch_interceptor, create_interceptor, Interceptor};
pub use middleware::{from_fn, operate, Middleware, MiddlewareResult, Operation};
pub use operators::finalize;

/// Prelude module for convenient imports
pub mod prelude {
    #[cfg(feature = "http")]
    pub use crate::adapters::HttpFetch;
    pub use crate::adapters::{FnClient, InterceptedClient, RequestClient};
    pub use crate::catalog::{ChainConfig, MiddlewareCatalog};
    pub use crate::context::{Context, Extensions};
    pub use crate::dispatch::{compose, Next, Pipeline};
    pub use crate::errors::{ConfigError, InterceptorError};
    pub use crate::interceptor::{create_fetch_interceptor, create_interceptor, Interceptor};
    pub use crate::middleware::{
        from_fn, operate, BoxFuture, LoggingMiddleware, Middleware, MiddlewareResult,
        Operation, TimingMiddleware,
    };
    pub use crate::observability::{init_tracing, TracingConfig};
    pub use crate::operators::finalize;
    pub use serde_json::{json, Value};
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::testing::StaticClient;

    #[tokio::test]
    async fn prelude_covers_common_usage() {
        let mut interceptor = create_interceptor(StaticClient::new(json!([1, 2])), true);
        interceptor.add(from_fn(|ctx, next| {
            Box::pin(async move {
                ctx.insert("authorization", "Bearer token");
                next.run(ctx).await
            })
        }));

        let res = interceptor.client().request(vec![json!("/users")]).await.unwrap();
        assert_eq!(res, json!([1, 2]));
    }
}

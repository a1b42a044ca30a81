//! Bindings between pipelines and the operations they wrap.
//!
//! - `RequestClient`: an axios-like client with `request` and `defaults`
//! - `FnClient`: a fetch-like async closure
//! - `InterceptedClient`: the wrapped client returned to callers
//! - `HttpFetch`: a `reqwest`-backed fetch client (feature `http`)

mod client;
#[cfg(feature = "http")]
mod http;
mod intercepted;

pub use client::{FnClient, RequestClient};
#[cfg(test)]
pub use client::MockRequestClient;
#[cfg(feature = "http")]
pub use http::{FetchRequest, HttpFetch};
pub use intercepted::InterceptedClient;

pub(crate) use client::Terminal;
pub(crate) use intercepted::{execute, PipelineSlot};

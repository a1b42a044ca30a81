//! Invocation context for interceptor pipelines.
//!
//! This module provides:
//! - The per-invocation `Context` handed to every middleware
//! - `Extensions`, the open key/value bag middleware use to share data

#[cfg(test)]
mod context_tests;
mod extensions;
mod invocation;

pub use extensions::Extensions;
pub use invocation::Context;

//! Named middleware and declarative chain configuration.

mod config;
mod registry;

pub use config::ChainConfig;
pub use registry::{MiddlewareCatalog, MiddlewareFactory, OperationFactory};

//! Name-based middleware catalog.

use crate::errors::{ConfigError, InterceptorError};
use crate::middleware::{LoggingMiddleware, Middleware, Operation, TimingMiddleware};
use crate::operators::finalize;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Factory function type for plain middleware.
pub type MiddlewareFactory = Box<dyn Fn() -> Arc<dyn Middleware> + Send + Sync>;

/// Factory function type for operations.
pub type OperationFactory = Box<dyn Fn() -> Operation + Send + Sync>;

enum CatalogEntry {
    Middleware(MiddlewareFactory),
    Operation(OperationFactory),
}

/// Registry of named middleware and operations.
///
/// Entries are factories, so every resolution produces a fresh instance.
/// Operations are kept apart from plain middleware: only names registered
/// through [`register_operation`](Self::register_operation) can be injected
/// through a continuation.
#[derive(Default)]
pub struct MiddlewareCatalog {
    entries: RwLock<HashMap<String, CatalogEntry>>,
}

impl MiddlewareCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog with the built-in middleware registered.
    ///
    /// - `logging`: [`LoggingMiddleware`]
    /// - `timing`: [`TimingMiddleware`]
    /// - `finalize` (operation): a no-op finalizer that logs completion
    #[must_use]
    pub fn with_builtins() -> Self {
        let catalog = Self::new();
        catalog.register("logging", LoggingMiddleware::default);
        catalog.register("timing", TimingMiddleware::default);
        catalog.register_operation("finalize", || {
            finalize(|| debug!("invocation finalized"))
        });
        catalog
    }

    /// Registers a middleware factory under `name`, replacing any entry.
    pub fn register<M, F>(&self, name: impl Into<String>, factory: F)
    where
        M: Middleware + 'static,
        F: Fn() -> M + Send + Sync + 'static,
    {
        let factory: MiddlewareFactory = Box::new(move || Arc::new(factory()));
        self.entries
            .write()
            .insert(name.into(), CatalogEntry::Middleware(factory));
    }

    /// Registers an operation factory under `name`, replacing any entry.
    pub fn register_operation<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Operation + Send + Sync + 'static,
    {
        self.entries
            .write()
            .insert(name.into(), CatalogEntry::Operation(Box::new(factory)));
    }

    /// Checks if a name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Checks if a name is registered as an operation.
    #[must_use]
    pub fn is_operation(&self, name: &str) -> bool {
        matches!(self.entries.read().get(name), Some(CatalogEntry::Operation(_)))
    }

    /// Lists registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolves any entry, plain or operation, as a middleware.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Middleware>> {
        self.entries.read().get(name).map(|entry| match entry {
            CatalogEntry::Middleware(factory) => factory(),
            CatalogEntry::Operation(factory) => factory().into_stage(),
        })
    }

    /// Resolves an ordered list of names into a chain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotCallable`] for the first unknown name.
    pub fn build_chain<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<Arc<dyn Middleware>>, ConfigError> {
        names
            .iter()
            .enumerate()
            .map(|(position, name)| {
                let name = name.as_ref();
                self.resolve(name)
                    .ok_or_else(|| ConfigError::not_callable(position, name))
            })
            .collect()
    }

    /// Resolves a name registered as an operation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAnOperation`] if the name is unknown or
    /// registered as a plain middleware.
    pub fn operate_named(&self, name: &str) -> Result<Operation, ConfigError> {
        match self.entries.read().get(name) {
            Some(CatalogEntry::Operation(factory)) => Ok(factory()),
            _ => Err(ConfigError::not_an_operation(name)),
        }
    }

    /// Resolves a name for injection through a continuation.
    pub(crate) fn injectable(&self, name: &str) -> Result<Operation, InterceptorError> {
        self.operate_named(name)
            .map_err(|_| InterceptorError::invalid_operation(name))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl std::fmt::Debug for MiddlewareCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareCatalog")
            .field("names", &self.names())
            .finish()
    }
}

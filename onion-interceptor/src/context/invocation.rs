//! The per-invocation context threaded through every middleware.

use super::Extensions;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// Mutable state for a single pipeline invocation.
///
/// A context is created fresh for every call of a wrapped client and is
/// handed to each stage as `&mut Context`, so no two invocations ever share
/// one.
#[derive(Debug, Clone)]
pub struct Context {
    id: Uuid,
    created_at: DateTime<Utc>,
    /// Arguments the wrapped operation was invoked with.
    pub args: Vec<Value>,
    /// Default configuration of the wrapped client.
    pub cfg: Value,
    /// Result of the wrapped operation, set once it completes.
    pub res: Option<Value>,
    extensions: Extensions,
}

impl Context {
    /// Creates a context for the given call arguments and client defaults.
    #[must_use]
    pub fn new(args: Vec<Value>, cfg: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            args,
            cfg,
            res: None,
            extensions: Extensions::new(),
        }
    }

    /// Creates a context with no arguments and no defaults.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Value::Null)
    }

    /// Adds an extension entry.
    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(key, value);
        self
    }

    /// Returns the invocation id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns when the invocation started.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the argument at `index`.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Returns true once the wrapped operation has produced a result.
    #[must_use]
    pub fn has_response(&self) -> bool {
        self.res.is_some()
    }

    /// Takes the result out of the context.
    pub fn take_res(&mut self) -> Option<Value> {
        self.res.take()
    }

    /// Returns the extensions.
    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Returns the extensions mutably.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Gets an extension value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Gets an extension value deserialized into `T`.
    #[must_use]
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.extensions.get_as(key)
    }

    /// Sets an extension value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.extensions.insert(key, value)
    }

    /// Removes an extension value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.extensions.remove(key)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::empty()
    }
}

//! Error types for interceptor pipelines.
//!
//! Errors fall into three groups:
//! - configuration errors, raised while a chain is being assembled
//! - protocol violations, raised when a middleware misuses its continuation
//! - operation errors, raised by the wrapped client or a middleware body

use thiserror::Error;

/// Errors raised while assembling a middleware chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A chain entry did not resolve to a middleware.
    #[error("middleware or intercept must be a function! (position {position}: '{name}' is not a registered middleware)")]
    NotCallable {
        /// Zero-based position of the offending entry.
        position: usize,
        /// The name that failed to resolve.
        name: String,
    },

    /// A name passed to `operate_named` is not a registered operation.
    #[error("operate must be a function: '{name}' is not a registered operation")]
    NotAnOperation {
        /// The name that failed to resolve.
        name: String,
    },

    /// The chain configuration could not be parsed.
    #[error("invalid chain configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Creates a not-callable error for a chain position.
    #[must_use]
    pub fn not_callable(position: usize, name: impl Into<String>) -> Self {
        Self::NotCallable {
            position,
            name: name.into(),
        }
    }

    /// Creates a not-an-operation error.
    #[must_use]
    pub fn not_an_operation(name: impl Into<String>) -> Self {
        Self::NotAnOperation { name: name.into() }
    }
}

/// The main error type for pipeline invocations.
#[derive(Debug, Error)]
pub enum InterceptorError {
    /// The chain was misconfigured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A continuation was invoked more than once for the same position.
    #[error("next() called multiple times (position {position})")]
    MultipleNextCall {
        /// Position of the middleware whose continuation was reused.
        position: usize,
    },

    /// A value handed to a continuation is not an operation.
    #[error("'{name}' is not a valid operation")]
    InvalidOperation {
        /// Name of the rejected value.
        name: String,
    },

    /// A middleware deliberately stopped the chain.
    #[error("chain short-circuited: {0}")]
    ShortCircuit(String),

    /// The wrapped operation or a middleware body failed.
    #[error(transparent)]
    Operation(#[from] anyhow::Error),
}

impl InterceptorError {
    /// Creates an operation error from a message.
    #[must_use]
    pub fn operation(message: impl std::fmt::Display) -> Self {
        Self::Operation(anyhow::anyhow!("{message}"))
    }

    /// Creates a short-circuit error.
    #[must_use]
    pub fn short_circuit(reason: impl Into<String>) -> Self {
        Self::ShortCircuit(reason.into())
    }

    /// Creates an invalid operation error.
    #[must_use]
    pub fn invalid_operation(name: impl Into<String>) -> Self {
        Self::InvalidOperation { name: name.into() }
    }

    /// Returns true if the chain itself was misused.
    #[must_use]
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::MultipleNextCall { .. } | Self::InvalidOperation { .. }
        )
    }

    /// Returns true if a middleware aborted the chain on purpose.
    #[must_use]
    pub fn is_short_circuit(&self) -> bool {
        matches!(self, Self::ShortCircuit(_))
    }

    /// Returns true for configuration errors.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns the underlying operation error, if any.
    #[must_use]
    pub fn as_operation(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Operation(err) => Some(err),
            _ => None,
        }
    }
}

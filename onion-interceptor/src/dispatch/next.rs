//! The continuation handed to each middleware.

use super::cursor::Cursor;
use super::{dispatch, Chain};
use crate::catalog::MiddlewareCatalog;
use crate::context::Context;
use crate::middleware::{BoxFuture, Middleware, MiddlewareResult, Operation};
use std::sync::Arc;
use tracing::trace;

/// Continuation for the rest of the chain.
///
/// Each middleware receives the `Next` for its own position. Running it more
/// than once fails with [`InterceptorError::MultipleNextCall`].
///
/// [`InterceptorError::MultipleNextCall`]: crate::errors::InterceptorError::MultipleNextCall
#[derive(Clone)]
pub struct Next {
    chain: Chain,
    cursor: Arc<Cursor>,
    index: usize,
}

impl Next {
    pub(crate) fn new(chain: Chain, cursor: Arc<Cursor>, index: usize) -> Self {
        Self {
            chain,
            cursor,
            index,
        }
    }

    /// Returns the position of the middleware that owns this continuation.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    /// Returns how many stages are still ahead of this position.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chain.len().saturating_sub(self.index + 1)
    }

    /// Runs the rest of the chain.
    pub fn run<'a>(&self, ctx: &'a mut Context) -> BoxFuture<'a, MiddlewareResult> {
        dispatch(
            Arc::clone(&self.chain),
            Arc::clone(&self.cursor),
            Some(self.index),
            self.index + 1,
            ctx,
        )
    }

    /// Runs the rest of the chain with `operations` spliced in right after
    /// this position.
    ///
    /// The splice only affects the current invocation.
    pub fn run_with<'a, I>(&self, ctx: &'a mut Context, operations: I) -> BoxFuture<'a, MiddlewareResult>
    where
        I: IntoIterator<Item = Operation>,
    {
        let injected: Vec<Arc<dyn Middleware>> =
            operations.into_iter().map(Operation::into_stage).collect();
        if injected.is_empty() {
            return self.run(ctx);
        }

        let split = self.index + 1;
        trace!(
            position = self.index,
            injected = injected.len(),
            invocation_id = %ctx.id(),
            "splicing operations into chain"
        );

        let mut spliced = Vec::with_capacity(self.chain.len() + injected.len());
        spliced.extend_from_slice(&self.chain[..split]);
        spliced.extend(injected);
        spliced.extend_from_slice(&self.chain[split..]);

        dispatch(
            spliced.into(),
            Arc::clone(&self.cursor),
            Some(self.index),
            split,
            ctx,
        )
    }

    /// Runs the rest of the chain with catalog operations spliced in.
    ///
    /// Every name must be registered in `catalog` as an operation; a plain
    /// middleware or an unknown name fails the invocation with
    /// [`InterceptorError::InvalidOperation`].
    ///
    /// [`InterceptorError::InvalidOperation`]: crate::errors::InterceptorError::InvalidOperation
    pub fn run_with_named<'a, S>(
        &self,
        ctx: &'a mut Context,
        catalog: &MiddlewareCatalog,
        names: &[S],
    ) -> BoxFuture<'a, MiddlewareResult>
    where
        S: AsRef<str>,
    {
        match names
            .iter()
            .map(|name| catalog.injectable(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(operations) => self.run_with(ctx, operations),
            Err(err) => Box::pin(futures::future::ready(Err(err))),
        }
    }
}

impl std::fmt::Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("position", &self.index)
            .field("chain_len", &self.chain.len())
            .field("dispatched", &self.cursor.position())
            .finish_non_exhaustive()
    }
}

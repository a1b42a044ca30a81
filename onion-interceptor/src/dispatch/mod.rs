//! Onion-ordered dispatch of middleware chains.
//!
//! [`compose`] turns an ordered list of middleware into a [`Pipeline`].
//! Dispatching a pipeline runs the "before" half of every stage in order,
//! the innermost stage, then the "after" halves in reverse order:
//!
//! ```text
//! m0 start -> m1 start -> terminal -> m1 end -> m0 end
//! ```

mod cursor;
mod next;

pub use next::Next;

use crate::context::Context;
use crate::errors::InterceptorError;
use crate::middleware::{BoxFuture, Middleware, MiddlewareResult};
use cursor::Cursor;
use std::sync::Arc;
use tracing::{trace, warn};

/// Shared, immutable stage list.
pub(crate) type Chain = Arc<[Arc<dyn Middleware>]>;

/// A compiled middleware chain.
///
/// Cloning is cheap; clones share the same stage list.
#[derive(Clone)]
pub struct Pipeline {
    stages: Chain,
}

impl Pipeline {
    /// Creates a pipeline from an ordered list of stages.
    #[must_use]
    pub fn new(stages: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            stages: stages.into(),
        }
    }

    /// Creates a pipeline with no stages.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Returns a new pipeline with `stage` appended.
    #[must_use]
    pub fn with_stage(&self, stage: Arc<dyn Middleware>) -> Self {
        let mut stages = self.stages.to_vec();
        stages.push(stage);
        Self::new(stages)
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the pipeline has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the stage names in dispatch order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.name().to_string()).collect()
    }

    /// Runs `ctx` through every stage.
    ///
    /// Each call gets its own cursor, so concurrent dispatches of the same
    /// pipeline never interfere.
    pub fn dispatch<'a>(&self, ctx: &'a mut Context) -> BoxFuture<'a, MiddlewareResult> {
        dispatch(
            Arc::clone(&self.stages),
            Arc::new(Cursor::default()),
            None,
            0,
            ctx,
        )
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Composes middleware into a pipeline.
pub fn compose<I>(middlewares: I) -> Pipeline
where
    I: IntoIterator<Item = Arc<dyn Middleware>>,
{
    Pipeline::new(middlewares.into_iter().collect())
}

/// Dispatches stage `index` of `chain`.
///
/// `caller` is the position whose continuation requested the dispatch.
pub(crate) fn dispatch(
    chain: Chain,
    cursor: Arc<Cursor>,
    caller: Option<usize>,
    index: usize,
    ctx: &mut Context,
) -> BoxFuture<'_, MiddlewareResult> {
    Box::pin(async move {
        if !cursor.advance(index) {
            let position = caller.unwrap_or(index);
            warn!(
                position,
                invocation_id = %ctx.id(),
                "next() called multiple times"
            );
            return Err(InterceptorError::MultipleNextCall { position });
        }

        let Some(stage) = chain.get(index).map(Arc::clone) else {
            trace!(invocation_id = %ctx.id(), "reached end of chain");
            return Ok(None);
        };

        trace!(
            position = index,
            stage = stage.name(),
            invocation_id = %ctx.id(),
            "dispatching stage"
        );
        let next = Next::new(chain, cursor, index);
        stage.handle(ctx, next).await
    })
}

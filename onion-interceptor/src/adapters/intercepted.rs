//! The wrapped client handed back by an interceptor.

use super::client::RequestClient;
use crate::context::Context;
use crate::dispatch::Pipeline;
use crate::errors::InterceptorError;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, debug_span, Instrument};

/// The compiled pipeline shared between a registry and its wrapped clients.
pub(crate) type PipelineSlot = Arc<RwLock<Arc<Pipeline>>>;

/// A client whose every request runs through an interceptor pipeline.
///
/// Stays in sync with its registry: middleware added after this client was
/// handed out apply to later requests.
pub struct InterceptedClient<C: ?Sized> {
    client: Arc<C>,
    pipeline: PipelineSlot,
}

impl<C: RequestClient + ?Sized> InterceptedClient<C> {
    pub(crate) fn new(client: Arc<C>, pipeline: PipelineSlot) -> Self {
        Self { client, pipeline }
    }

    /// Performs a request through the pipeline.
    ///
    /// Unlike [`RequestClient::request`], the error keeps its
    /// [`InterceptorError`] kind.
    pub async fn call(&self, args: Vec<Value>) -> Result<Value, InterceptorError> {
        let pipeline = self.pipeline.read().clone();
        execute(pipeline, self.client.defaults(), args).await
    }

    /// Returns the unwrapped client.
    #[must_use]
    pub fn inner(&self) -> &Arc<C> {
        &self.client
    }
}

impl<C: ?Sized> Clone for InterceptedClient<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl<C: ?Sized> std::fmt::Debug for InterceptedClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptedClient")
            .field("pipeline", &*self.pipeline.read())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C> RequestClient for InterceptedClient<C>
where
    C: RequestClient + ?Sized,
{
    async fn request(&self, args: Vec<Value>) -> anyhow::Result<Value> {
        Ok(self.call(args).await?)
    }

    fn defaults(&self) -> Value {
        self.client.defaults()
    }
}

/// Runs one invocation of `pipeline`.
///
/// Returns the outermost middleware's explicit value if it gave one,
/// otherwise the wrapped operation's raw result, otherwise `Value::Null`.
pub(crate) async fn execute(
    pipeline: Arc<Pipeline>,
    defaults: Value,
    args: Vec<Value>,
) -> Result<Value, InterceptorError> {
    let mut ctx = Context::new(args, defaults);
    let span = debug_span!(
        "interceptor.request",
        invocation_id = %ctx.id(),
        stages = pipeline.len()
    );

    async move {
        debug!("invocation started");
        match pipeline.dispatch(&mut ctx).await {
            Ok(value) => {
                debug!(
                    explicit_return = value.is_some(),
                    has_response = ctx.has_response(),
                    "invocation completed"
                );
                Ok(value.or_else(|| ctx.take_res()).unwrap_or(Value::Null))
            }
            Err(err) => {
                debug!(
                    error = %err,
                    protocol_violation = err.is_protocol_violation(),
                    "invocation failed"
                );
                Err(err)
            }
        }
    }
    .instrument(span)
    .await
}

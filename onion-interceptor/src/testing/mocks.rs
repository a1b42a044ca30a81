//! Mock clients and middleware for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::RequestClient;
use crate::context::Context;
use crate::dispatch::Next;
use crate::middleware::{Middleware, MiddlewareResult};

/// A shared, ordered log of events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Returns a copy of all entries.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing was logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Clears the log.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// A middleware that logs `"<name> start"` and `"<name> end"` around the
/// rest of the chain.
#[derive(Debug, Clone)]
pub struct RecordingMiddleware {
    name: String,
    log: EventLog,
}

impl RecordingMiddleware {
    /// Creates a recording middleware writing to `log`.
    #[must_use]
    pub fn new(name: impl Into<String>, log: &EventLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
        }
    }
}

#[async_trait]
impl Middleware for RecordingMiddleware {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, ctx: &mut Context, next: Next) -> MiddlewareResult {
        self.log.push(format!("{} start", self.name));
        let result = next.run(ctx).await;
        self.log.push(format!("{} end", self.name));
        result
    }
}

/// A client that always returns the same response and records its calls.
#[derive(Debug)]
pub struct StaticClient {
    response: Value,
    defaults: Value,
    delay: Option<Duration>,
    calls: Mutex<Vec<Vec<Value>>>,
}

impl StaticClient {
    /// Creates a client returning `response`.
    #[must_use]
    pub fn new(response: Value) -> Self {
        Self {
            response,
            defaults: Value::Null,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Sets the defaults exposed as `ctx.cfg`.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sleeps before responding.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the number of requests made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the arguments of every request, in call order.
    #[must_use]
    pub fn recorded_args(&self) -> Vec<Vec<Value>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl RequestClient for StaticClient {
    async fn request(&self, args: Vec<Value>) -> anyhow::Result<Value> {
        self.calls.lock().push(args);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.response.clone())
    }

    fn defaults(&self) -> Value {
        self.defaults.clone()
    }
}

/// A client that always fails.
#[derive(Debug, Clone)]
pub struct FailingClient {
    message: String,
}

impl FailingClient {
    /// Creates a failing client.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl RequestClient for FailingClient {
    async fn request(&self, _args: Vec<Value>) -> anyhow::Result<Value> {
        Err(anyhow::anyhow!("{}", self.message))
    }
}

/// A client that echoes its arguments back after a delay.
#[derive(Debug, Clone)]
pub struct EchoClient {
    delay: Duration,
}

impl EchoClient {
    /// Creates an echo client.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RequestClient for EchoClient {
    async fn request(&self, args: Vec<Value>) -> anyhow::Result<Value> {
        tokio::time::sleep(self.delay).await;
        Ok(Value::Array(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_log() {
        let log = EventLog::new();
        let shared = log.clone();
        shared.push("a");
        log.push("b");

        assert_eq!(log.entries(), vec!["a", "b"]);
        assert_eq!(shared.len(), 2);

        log.clear();
        assert!(shared.is_empty());
    }

    #[tokio::test]
    async fn test_static_client_records_calls() {
        let client = StaticClient::new(json!({"ok": true}));

        let res = client.request(vec![json!("/users")]).await.unwrap();

        assert_eq!(res, json!({"ok": true}));
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.recorded_args(), vec![vec![json!("/users")]]);
    }

    #[tokio::test]
    async fn test_failing_client() {
        let client = FailingClient::new("503 Service Unavailable");
        let err = client.request(vec![]).await.unwrap_err();
        assert_eq!(err.to_string(), "503 Service Unavailable");
        assert!(client.defaults().is_null());
    }

    #[tokio::test]
    async fn test_echo_client() {
        let client = EchoClient::new(Duration::from_millis(1));
        let res = client.request(vec![json!(1), json!(2)]).await.unwrap();
        assert_eq!(res, json!([1, 2]));
    }
}

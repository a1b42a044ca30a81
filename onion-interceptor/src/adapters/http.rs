//! A fetch-like client backed by `reqwest`.

use super::client::RequestClient;
use anyhow::{anyhow, Context as _};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

/// A parsed `fetch(input, init)` call.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// Target URL.
    pub url: String,
    /// HTTP method, upper-cased.
    pub method: String,
    /// Request headers.
    pub headers: Vec<(String, String)>,
    /// Request body. Strings are sent verbatim, anything else as JSON.
    pub body: Option<Value>,
}

impl FetchRequest {
    /// Parses fetch-style arguments: a URL and an optional init object.
    ///
    /// The URL may also be given as `{"url": ...}`. A relative URL is joined
    /// onto `base_url` when one is configured.
    pub fn from_args(args: &[Value], base_url: Option<&str>) -> anyhow::Result<Self> {
        let input = args.first().ok_or_else(|| anyhow!("fetch requires a url argument"))?;
        let raw_url = match input {
            Value::String(url) => url.as_str(),
            Value::Object(map) => map
                .get("url")
                .and_then(Value::as_str)
                .ok_or_else(|| anyhow!("fetch input object has no 'url' field"))?,
            other => return Err(anyhow!("unsupported fetch input: {other}")),
        };

        let url = match base_url {
            Some(base) if !raw_url.contains("://") => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                raw_url.trim_start_matches('/')
            ),
            _ => raw_url.to_string(),
        };

        let init = args.get(1).and_then(Value::as_object);
        let method = init
            .and_then(|i| i.get("method"))
            .and_then(Value::as_str)
            .unwrap_or("GET")
            .to_ascii_uppercase();
        let headers: Vec<(String, String)> = init
            .and_then(|i| i.get("headers"))
            .and_then(Value::as_object)
            .map(|h| {
                h.iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default();
        let body = init.and_then(|i| i.get("body")).cloned();

        Ok(Self {
            url,
            method,
            headers,
            body,
        })
    }
}

/// Fetch-like client performing real HTTP requests.
///
/// Resolves to `{"status", "ok", "headers", "body"}`; a JSON body is parsed,
/// anything else is returned as a string. Non-2xx statuses are not errors.
#[derive(Debug, Clone, Default)]
pub struct HttpFetch {
    client: reqwest::Client,
    defaults: Value,
}

impl HttpFetch {
    /// Creates a client with a default `reqwest::Client`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured `reqwest::Client`.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Sets the defaults; a `baseURL` entry is used to resolve relative URLs.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.defaults = defaults;
        self
    }

    fn base_url(&self) -> Option<&str> {
        self.defaults.get("baseURL").and_then(Value::as_str)
    }
}

#[async_trait]
impl RequestClient for HttpFetch {
    async fn request(&self, args: Vec<Value>) -> anyhow::Result<Value> {
        let req = FetchRequest::from_args(&args, self.base_url())?;
        let method = reqwest::Method::from_bytes(req.method.as_bytes())
            .with_context(|| format!("invalid HTTP method '{}'", req.method))?;

        let mut builder = self.client.request(method, &req.url);
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match req.body {
            Some(Value::String(text)) => builder.body(text),
            Some(Value::Null) | None => builder,
            Some(other) => builder.json(&other),
        };

        let response = builder
            .send()
            .await
            .with_context(|| format!("request to {} failed", req.url))?;
        let status = response.status();
        let headers: Map<String, Value> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), Value::String(v.to_string())))
            })
            .collect();
        let text = response.text().await?;
        let body = match serde_json::from_str::<Value>(&text) {
            Ok(parsed) => parsed,
            Err(_) => Value::String(text),
        };

        Ok(json!({
            "status": status.as_u16(),
            "ok": status.is_success(),
            "headers": headers,
            "body": body,
        }))
    }

    fn defaults(&self) -> Value {
        self.defaults.clone()
    }
}

//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "onion_interceptor=info";

/// Settings for [`init_tracing`].
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Filter directives used when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl TracingConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback filter directives.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    /// Enables JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_filter: DEFAULT_FILTER.to_string(),
            json: false,
        }
    }
}

/// Installs a global `tracing` subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &TracingConfig) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(config.env_filter());
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::new();
        assert_eq!(config.default_filter, DEFAULT_FILTER);
        assert!(!config.json);
    }

    #[test]
    fn test_builder() {
        let config = TracingConfig::new()
            .with_filter("onion_interceptor=trace")
            .with_json(true);

        assert_eq!(config.default_filter, "onion_interceptor=trace");
        assert!(config.json);
    }

    #[test]
    fn test_second_init_fails() {
        let config = TracingConfig::new();
        // The first call may lose to another test; the second never succeeds.
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}

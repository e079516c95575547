//! Client configuration
//!
//! Configuration is an explicit value handed to [`crate::Client`] — there is
//! no ambient singleton. Build one with [`ClientConfig::builder`] or load it
//! from the well-known `CONEDB_*` environment variables with
//! [`ClientConfig::from_env`].

use std::time::Duration;

use conedb_core::env;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::api::Metric;
use crate::error::{Error, Result};
use crate::readiness::ReadinessConfig;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default index dimensionality when none is configured or supplied
pub const DEFAULT_DIMENSION: u32 = 1536;

/// Configuration for [`crate::Client`]
#[derive(Clone)]
pub struct ClientConfig {
    /// API key sent as the `Api-Key` header
    pub api_key: SecretString,
    /// Controller environment name, used to derive the base URL
    pub environment: Option<String>,
    /// Explicit base URL override
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Index used by [`crate::Client::default_index`] when no name is given
    pub default_index: Option<String>,
    /// Default dimensionality for index creation
    pub default_dimension: Option<u32>,
    /// Default similarity metric for index creation
    pub default_metric: Metric,
    /// Readiness polling behavior after index creation
    pub readiness: ReadinessConfig,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("default_index", &self.default_index)
            .field("default_dimension", &self.default_dimension)
            .field("default_metric", &self.default_metric)
            .field("readiness", &self.readiness)
            .finish()
    }
}

impl ClientConfig {
    /// Create a builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from the `CONEDB_*` environment variables.
    ///
    /// `CONEDB_API_KEY` and `CONEDB_ENV` are required; `CONEDB_INDEX` sets
    /// the default index and `CONEDB_DEF_DIM` overrides the default
    /// dimensionality when set.
    pub fn from_env() -> Result<Self> {
        let api_key = env::get_env(env::API_KEY)
            .ok_or_else(|| Error::Config(format!("{} is not set", env::API_KEY)))?;
        let environment = env::get_env(env::ENVIRONMENT)
            .ok_or_else(|| Error::Config(format!("{} is not set", env::ENVIRONMENT)))?;

        let mut builder = Self::builder().api_key(api_key).environment(environment);
        if let Some(index) = env::get_env(env::INDEX) {
            builder = builder.default_index(index);
        }
        if let Some(dim) = env::get_env(env::DEFAULT_DIMENSION) {
            let dim = dim.parse::<u32>().map_err(|_| {
                Error::Config(format!("{} is not a valid dimension: {dim}", env::DEFAULT_DIMENSION))
            })?;
            builder = builder.default_dimension(dim);
        }
        builder.build()
    }

    /// The controller base URL: the explicit override when set, otherwise
    /// derived from the environment name.
    pub fn controller_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None => format!(
                "https://controller.{}.pinecone.io",
                self.environment.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    api_key: Option<SecretString>,
    environment: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    default_index: Option<String>,
    default_dimension: Option<u32>,
    default_metric: Option<Metric>,
    readiness: Option<ReadinessConfig>,
}

impl ClientConfigBuilder {
    /// Set the API key (required)
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Set a pre-built SecretString API key
    pub fn api_key_secret(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Set the controller environment name
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Override the base URL (for proxies and local controllers)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout (default: 30s)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the index used when no name is given
    pub fn default_index(mut self, name: impl Into<String>) -> Self {
        self.default_index = Some(name.into());
        self
    }

    /// Set the default dimensionality for index creation
    pub fn default_dimension(mut self, dimension: u32) -> Self {
        self.default_dimension = Some(dimension);
        self
    }

    /// Set the default similarity metric for index creation
    pub fn default_metric(mut self, metric: Metric) -> Self {
        self.default_metric = Some(metric);
        self
    }

    /// Set the readiness polling behavior
    pub fn readiness(mut self, readiness: ReadinessConfig) -> Self {
        self.readiness = Some(readiness);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| Error::Config("api_key is required".to_string()))?;

        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("api_key must not be empty".to_string()));
        }

        if self.environment.is_none() && self.base_url.is_none() {
            return Err(Error::Config(
                "either environment or base_url is required".to_string(),
            ));
        }

        let base_url = match self.base_url {
            Some(url) => {
                if !url.starts_with("https://") && !url.starts_with("http://") {
                    return Err(Error::Config(format!(
                        "base_url must start with http:// or https://, got: {url}"
                    )));
                }
                if url.starts_with("http://")
                    && !url.contains("localhost")
                    && !url.contains("127.0.0.1")
                {
                    warn!("base_url uses plain HTTP — API key will be sent in cleartext");
                }
                Some(url.trim_end_matches('/').to_string())
            }
            None => None,
        };

        let config = ClientConfig {
            api_key,
            environment: self.environment,
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            default_index: self.default_index,
            default_dimension: self.default_dimension.or(Some(DEFAULT_DIMENSION)),
            default_metric: self.default_metric.unwrap_or_default(),
            readiness: self.readiness.unwrap_or_default(),
        };

        debug!(
            controller_url = %config.controller_url(),
            default_dimension = ?config.default_dimension,
            default_metric = ?config.default_metric,
            "client configuration built"
        );

        Ok(config)
    }
}

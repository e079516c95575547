//! Client facade
//!
//! [`Client`] orchestrates the REST API, the readiness poller and the event
//! emitter: index lifecycle (get-or-create, bounded readiness wait, delete),
//! cached per-index handles for vector operations, and lifecycle event
//! emission for external subscribers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use conedb_core::events::{Emitter, Event};
use conedb_core::types::{metadata, MetaValue, Metadata};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::{IndexDescription, Metric, RestApi};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::readiness::wait_until_ready;

/// Lifecycle events emitted by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientEvent {
    /// An index reached the ready state after creation
    IndexReady,
    /// Index provisioning failed or the readiness budget ran out
    IndexFailed,
    /// The controller accepted an index-creation request
    IndexCreated,
    /// An index was deleted
    IndexDeleted,
    /// Result of [`Client::init`]
    InitResult,
}

/// Options for [`Client::use_index`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UseIndexOptions {
    /// Create the index when it does not exist
    pub create_if_missing: bool,
    /// Dimensionality for creation (falls back to the configured default)
    pub dimension: Option<u32>,
    /// Metric for creation (falls back to the configured default)
    pub metric: Option<Metric>,
}

impl UseIndexOptions {
    /// Request creation when the index does not exist.
    pub fn create_if_missing(mut self) -> Self {
        self.create_if_missing = true;
        self
    }

    /// Set the creation dimensionality.
    pub fn dimension(mut self, dimension: u32) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Set the creation metric.
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = Some(metric);
        self
    }
}

/// Async client for a Pinecone-style vector database.
///
/// # Example
///
/// ```rust,no_run
/// use conedb_client::{Client, ClientConfig, UseIndexOptions};
///
/// # async fn example() -> Result<(), conedb_client::Error> {
/// let config = ClientConfig::builder()
///     .api_key("...")
///     .environment("us-west4-gcp-free")
///     .build()?;
/// let client = Client::new(config)?;
///
/// let index = client
///     .use_index("articles", UseIndexOptions::default().create_if_missing())
///     .await?;
/// index.upsert(vec![], None).await?;
/// # Ok(())
/// # }
/// ```
pub struct Client {
    config: ClientConfig,
    api: Arc<RestApi>,
    indices: Mutex<HashMap<String, Index>>,
    events: Emitter<ClientEvent>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish()
    }
}

impl Client {
    /// Create a client from explicit configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = Arc::new(RestApi::new(&config)?);
        debug!(controller_url = %config.controller_url(), "client created");
        Ok(Self {
            config,
            api,
            indices: Mutex::new(HashMap::new()),
            events: Emitter::new(),
        })
    }

    /// Create a client from the `CONEDB_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The lifecycle event emitter (for filters and muting).
    pub fn events(&self) -> &Emitter<ClientEvent> {
        &self.events
    }

    /// Register a lifecycle event listener.
    pub fn on<F>(&self, event: ClientEvent, listener: F)
    where
        F: Fn(&Event<ClientEvent>) + Send + Sync + 'static,
    {
        self.events.on(event, listener);
    }

    /// Suppress emission of `event`.
    pub fn mute(&self, event: ClientEvent) {
        self.events.mute(event);
    }

    /// Re-enable emission of `event`.
    pub fn unmute(&self, event: ClientEvent) {
        self.events.unmute(event);
    }

    /// Verify connectivity by listing indexes; emits `InitResult`.
    pub async fn init(&self) -> Result<Vec<String>> {
        let result = self.api.list_indexes().await;
        match &result {
            Ok(names) => self.events.emit(
                ClientEvent::InitResult,
                metadata([
                    ("ok".to_string(), MetaValue::from(true)),
                    ("indexes".to_string(), MetaValue::from(names.len() as i64)),
                ]),
            ),
            Err(e) => self.events.emit(
                ClientEvent::InitResult,
                metadata([
                    ("ok".to_string(), MetaValue::from(false)),
                    ("error".to_string(), MetaValue::from(e.to_string())),
                ]),
            ),
        }
        result
    }

    /// Get a (cached) handle for vector operations against `name`.
    pub fn index(&self, name: &str) -> Index {
        let mut indices = self.indices.lock().expect("index cache poisoned");
        indices
            .entry(name.to_string())
            .or_insert_with(|| Index::new(name, self.api.clone()))
            .clone()
    }

    /// Handle for the configured default index (`CONEDB_INDEX` or
    /// [`crate::ClientConfigBuilder::default_index`]).
    pub fn default_index(&self) -> Result<Index> {
        match self.config.default_index.as_deref() {
            Some(name) => Ok(self.index(name)),
            None => Err(Error::IndexNameMissing),
        }
    }

    /// Whether the named index exists.
    ///
    /// A not-found response maps to `false`; every other error propagates
    /// unchanged.
    pub async fn index_exists(&self, name: &str) -> Result<bool> {
        match self.api.index_description(name).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create an index and wait until it is ready.
    ///
    /// Emits `IndexCreated` once the controller accepts the request, then
    /// `IndexReady` on success or `IndexFailed` when provisioning fails or
    /// the readiness budget runs out.
    pub async fn create_index(
        &self,
        name: &str,
        dimension: Option<u32>,
        metric: Option<Metric>,
    ) -> Result<()> {
        let cancel = CancellationToken::new();
        self.create_index_with_cancel(name, dimension, metric, &cancel)
            .await
    }

    /// [`Client::create_index`] with caller-controlled cancellation of the
    /// readiness wait.
    pub async fn create_index_with_cancel(
        &self,
        name: &str,
        dimension: Option<u32>,
        metric: Option<Metric>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(Error::IndexNameMissing);
        }
        let dimension = dimension
            .or(self.config.default_dimension)
            .ok_or_else(|| Error::CreationDataMissing("dimension".to_string()))?;
        let metric = metric.unwrap_or(self.config.default_metric);

        self.api.create_index(name, dimension, metric).await?;
        self.events
            .emit(ClientEvent::IndexCreated, index_meta(name));

        match wait_until_ready(self.api.as_ref(), name, &self.config.readiness, cancel).await {
            Ok(()) => {
                info!(index = name, "index ready");
                self.events.emit(ClientEvent::IndexReady, index_meta(name));
                Ok(())
            }
            Err(e @ (Error::CreationFailed(_) | Error::RetryExhausted { .. })) => {
                let mut meta = index_meta(name);
                meta.insert("error".to_string(), MetaValue::from(e.to_string()));
                self.events.emit(ClientEvent::IndexFailed, meta);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Get-or-create flow: return a handle for `name`, creating the index
    /// first when requested.
    pub async fn use_index(&self, name: &str, options: UseIndexOptions) -> Result<Index> {
        if name.is_empty() {
            return Err(Error::IndexNameMissing);
        }

        let exists = self.index_exists(name).await?;
        if !exists {
            if !options.create_if_missing {
                return Err(Error::IndexNotFound(name.to_string()));
            }
            self.create_index(name, options.dimension, options.metric)
                .await?;
        }

        Ok(self.index(name))
    }

    /// Describe an index.
    pub async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        self.api.index_description(name).await
    }

    /// Apply a configuration patch to an index.
    pub async fn configure_index(&self, name: &str, patch: &serde_json::Value) -> Result<()> {
        self.api.configure_index(name, patch).await
    }

    /// Delete an index; emits `IndexDeleted` and drops the cached handle.
    pub async fn delete_index(&self, name: &str) -> Result<()> {
        self.api.delete_index(name).await?;
        self.indices
            .lock()
            .expect("index cache poisoned")
            .remove(name);
        self.events
            .emit(ClientEvent::IndexDeleted, index_meta(name));
        Ok(())
    }

    /// List all index names.
    pub async fn list_indexes(&self) -> Result<Vec<String>> {
        self.api.list_indexes().await
    }

    /// Create a collection.
    pub async fn create_collection(&self, name: &str) -> Result<()> {
        self.api.create_collection(name).await
    }

    /// Delete a collection.
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        self.api.delete_collection(name).await
    }

    /// Describe a collection (controller-defined payload).
    pub async fn describe_collection(&self, name: &str) -> Result<serde_json::Value> {
        self.api.describe_collection(name).await
    }

    /// List all collection names.
    pub async fn list_collections(&self) -> Result<Vec<String>> {
        self.api.list_collections().await
    }
}

fn index_meta(name: &str) -> Metadata {
    metadata([("index", name)])
}

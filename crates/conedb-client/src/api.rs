//! REST endpoint wrappers and wire types
//!
//! [`RestApi`] exposes the controller's index, collection and vector
//! endpoints as typed async methods. Request envelopes and response models
//! mirror the controller's JSON (camelCase field names, optional fields
//! omitted when unset); vector metadata is an opaque JSON payload.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::readiness::DescribeIndex;
use crate::transport::Transport;

/// Similarity metric for a vector index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Cosine similarity (controller default)
    #[default]
    Cosine,
    /// Euclidean distance
    Euclidean,
    /// Dot product
    DotProduct,
}

/// Provisioning state reported by the controller.
///
/// `Ready` and `Failed` are terminal; anything else — including states this
/// SDK does not know about — is treated as still-provisioning by the
/// readiness poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexState {
    /// Provisioning has started
    Initializing,
    /// Scaling up
    ScalingUp,
    /// Scaling down
    ScalingDown,
    /// Being torn down
    Terminating,
    /// Serving traffic
    Ready,
    /// Provisioning failed terminally
    Failed,
    /// Any state this SDK does not recognize
    #[serde(other)]
    Unknown,
}

impl IndexState {
    /// Whether this state ends the readiness poll.
    pub fn is_terminal(&self) -> bool {
        matches!(self, IndexState::Ready | IndexState::Failed)
    }
}

/// Description of an index as reported by the controller
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDescription {
    /// Index name echoed back for correlation
    #[serde(default)]
    pub name: Option<String>,
    /// Configured dimensionality
    #[serde(default)]
    pub dimension: Option<u32>,
    /// Configured similarity metric
    #[serde(default)]
    pub metric: Option<Metric>,
    /// Current provisioning state
    pub status: IndexState,
}

/// Sparse vector components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparseValues {
    /// Indices of the non-zero dimensions
    pub indices: Vec<u32>,
    /// Values at those dimensions
    pub values: Vec<f32>,
}

/// A vector record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vector {
    /// Record id
    pub id: String,
    /// Dense values
    #[serde(default)]
    pub values: Vec<f32>,
    /// Optional sparse components
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse_values: Option<SparseValues>,
    /// Opaque metadata payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Vector {
    /// Create a dense vector record.
    pub fn new(id: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            values,
            sparse_values: None,
            metadata: None,
        }
    }

    /// Attach an opaque metadata payload.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Response to an upsert request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertResponse {
    /// Number of vectors written
    #[serde(default)]
    pub upserted_count: u64,
}

/// A single similarity match
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMatch {
    /// Matched record id
    pub id: String,
    /// Similarity score
    #[serde(default)]
    pub score: f32,
    /// Dense values, when requested
    #[serde(default)]
    pub values: Vec<f32>,
    /// Sparse components, when present
    #[serde(default)]
    pub sparse_values: Option<SparseValues>,
    /// Opaque metadata payload, when requested
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Response to a similarity query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Matches ordered by score
    #[serde(default)]
    pub matches: Vec<QueryMatch>,
    /// Namespace the query ran against
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Response to a fetch request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    /// Fetched records keyed by id
    #[serde(default)]
    pub vectors: HashMap<String, Vector>,
    /// Namespace the fetch ran against
    #[serde(default)]
    pub namespace: Option<String>,
}

// ============================================================================
// Request envelopes (private)
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIndexEnvelope {
    create_request: CreateIndexRequest,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIndexRequest {
    name: String,
    dimension: u32,
    metric: Metric,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpsertEnvelope {
    upsert_request: UpsertRequest,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpsertRequest {
    vectors: Vec<Vector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateEnvelope {
    update_request: UpdateRequest,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    set_metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryEnvelope {
    query_request: QueryRequest,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    vector: Vec<f32>,
    top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_metadata: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCollectionRequest {
    collection_name: String,
}

// ============================================================================
// RestApi
// ============================================================================

/// Typed wrapper around the controller's REST endpoints.
#[derive(Debug)]
pub struct RestApi {
    transport: Transport,
}

impl RestApi {
    /// Build the API client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
        })
    }

    // ---- Index operations --------------------------------------------------

    /// Issue the index-creation request. Returns as soon as the controller
    /// accepts it; readiness is a separate concern
    /// (see [`crate::readiness::wait_until_ready`]).
    pub async fn create_index(&self, name: &str, dimension: u32, metric: Metric) -> Result<()> {
        debug!(index = name, dimension, ?metric, "creating index");
        let body = CreateIndexEnvelope {
            create_request: CreateIndexRequest {
                name: name.to_string(),
                dimension,
                metric,
            },
        };
        self.transport.post_unit("/indexes/create", &body).await
    }

    /// Fetch the provisioning description of an index.
    pub async fn index_description(&self, name: &str) -> Result<IndexDescription> {
        self.transport
            .get(&format!("/indexes/describe/{name}"))
            .await
    }

    /// Apply a configuration patch to an existing index.
    pub async fn configure_index(&self, name: &str, patch: &serde_json::Value) -> Result<()> {
        self.transport
            .patch_unit(&format!("/databases/{name}"), patch)
            .await
    }

    /// Delete an index.
    pub async fn delete_index(&self, name: &str) -> Result<()> {
        self.transport
            .delete_unit(&format!("/databases/{name}"), &[])
            .await
    }

    /// List all index names.
    pub async fn list_indexes(&self) -> Result<Vec<String>> {
        self.transport.get("/databases").await
    }

    // ---- Collection operations ---------------------------------------------

    /// Create a collection.
    pub async fn create_collection(&self, name: &str) -> Result<()> {
        let body = CreateCollectionRequest {
            collection_name: name.to_string(),
        };
        self.transport.post_unit("/collections", &body).await
    }

    /// Delete a collection.
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        self.transport
            .delete_unit(&format!("/collections/{name}"), &[])
            .await
    }

    /// Describe a collection. The response shape is controller-defined and
    /// returned as-is.
    pub async fn describe_collection(&self, name: &str) -> Result<serde_json::Value> {
        self.transport.get(&format!("/collections/{name}")).await
    }

    /// List all collection names.
    pub async fn list_collections(&self) -> Result<Vec<String>> {
        self.transport.get("/collections").await
    }

    // ---- Vector operations -------------------------------------------------

    /// Upsert vectors into an index.
    pub async fn upsert_vectors(
        &self,
        _index: &str,
        vectors: Vec<Vector>,
        namespace: Option<&str>,
    ) -> Result<UpsertResponse> {
        let body = UpsertEnvelope {
            upsert_request: UpsertRequest {
                vectors,
                namespace: namespace.map(str::to_string),
            },
        };
        self.transport.post("/vectors/upsert", &body).await
    }

    /// Update one vector's values and/or metadata.
    pub async fn update_vector(
        &self,
        _index: &str,
        id: &str,
        values: Option<Vec<f32>>,
        set_metadata: Option<serde_json::Value>,
        namespace: Option<&str>,
    ) -> Result<()> {
        let body = UpdateEnvelope {
            update_request: UpdateRequest {
                id: id.to_string(),
                values,
                set_metadata,
                namespace: namespace.map(str::to_string),
            },
        };
        self.transport.post_unit("/vectors/update", &body).await
    }

    /// Delete vectors by id.
    pub async fn delete_vectors(
        &self,
        _index: &str,
        ids: &[String],
        namespace: Option<&str>,
    ) -> Result<()> {
        let query = ids_query(ids, namespace);
        self.transport.delete_unit("/vectors/delete", &query).await
    }

    /// Fetch vectors by id.
    pub async fn fetch_vectors(
        &self,
        _index: &str,
        ids: &[String],
        namespace: Option<&str>,
    ) -> Result<FetchResponse> {
        let query = ids_query(ids, namespace);
        self.transport.get_with_query("/vectors/fetch", &query).await
    }

    /// Run a similarity query.
    #[allow(clippy::too_many_arguments)]
    pub async fn query_vectors(
        &self,
        _index: &str,
        vector: Vec<f32>,
        top_k: u32,
        namespace: Option<&str>,
        include_values: bool,
        include_metadata: bool,
    ) -> Result<QueryResponse> {
        let body = QueryEnvelope {
            query_request: QueryRequest {
                vector,
                top_k,
                namespace: namespace.map(str::to_string),
                include_values: include_values.then_some(true),
                include_metadata: include_metadata.then_some(true),
            },
        };
        self.transport.post("/query", &body).await
    }
}

fn ids_query(ids: &[String], namespace: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query: Vec<(&'static str, String)> =
        ids.iter().map(|id| ("ids", id.clone())).collect();
    if let Some(ns) = namespace {
        query.push(("namespace", ns.to_string()));
    }
    query
}

#[async_trait]
impl DescribeIndex for RestApi {
    async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        self.index_description(name).await
    }
}

//! Index handle
//!
//! An [`Index`] binds an index name to the REST API and exposes the vector
//! operations scoped to that index. Handles are cheap to clone and share
//! the underlying transport.

use std::sync::Arc;

use crate::api::{FetchResponse, QueryResponse, RestApi, UpsertResponse, Vector};
use crate::error::Result;

/// Handle for vector operations against a named index.
#[derive(Debug, Clone)]
pub struct Index {
    name: String,
    api: Arc<RestApi>,
}

impl Index {
    pub(crate) fn new(name: impl Into<String>, api: Arc<RestApi>) -> Self {
        Self {
            name: name.into(),
            api,
        }
    }

    /// The index this handle is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upsert vectors, optionally into a namespace.
    pub async fn upsert(
        &self,
        vectors: Vec<Vector>,
        namespace: Option<&str>,
    ) -> Result<UpsertResponse> {
        self.api.upsert_vectors(&self.name, vectors, namespace).await
    }

    /// Update one vector's values and/or metadata.
    pub async fn update(
        &self,
        id: &str,
        values: Option<Vec<f32>>,
        set_metadata: Option<serde_json::Value>,
        namespace: Option<&str>,
    ) -> Result<()> {
        self.api
            .update_vector(&self.name, id, values, set_metadata, namespace)
            .await
    }

    /// Delete vectors by id.
    pub async fn delete(&self, ids: &[String], namespace: Option<&str>) -> Result<()> {
        self.api.delete_vectors(&self.name, ids, namespace).await
    }

    /// Fetch vectors by id.
    pub async fn fetch(&self, ids: &[String], namespace: Option<&str>) -> Result<FetchResponse> {
        self.api.fetch_vectors(&self.name, ids, namespace).await
    }

    /// Run a similarity query returning the `top_k` closest records.
    pub async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u32,
        namespace: Option<&str>,
    ) -> Result<QueryResponse> {
        self.api
            .query_vectors(&self.name, vector, top_k, namespace, false, true)
            .await
    }
}

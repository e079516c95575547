//! # conedb-client — Vector Database Client
//!
//! Async client for Pinecone-style managed vector databases.
//!
//! This crate provides:
//! - **Index lifecycle** — create / describe / configure / delete / list,
//!   with a bounded readiness poll after creation
//! - **Vector operations** — upsert / update / fetch / delete / similarity
//!   query through per-index handles
//! - **Lifecycle events** — typed notifications (`IndexReady`,
//!   `IndexFailed`, …) via the [`conedb_core::events`] emitter
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use conedb_client::{Client, ClientConfig, UseIndexOptions, Vector};
//!
//! # async fn example() -> Result<(), conedb_client::Error> {
//! let config = ClientConfig::builder()
//!     .api_key("...")
//!     .environment("us-west4-gcp-free")
//!     .build()?;
//! let client = Client::new(config)?;
//!
//! let index = client
//!     .use_index("articles", UseIndexOptions::default().create_if_missing())
//!     .await?;
//!
//! index
//!     .upsert(vec![Vector::new("a1", vec![0.1; 1536])], None)
//!     .await?;
//! let matches = index.query(vec![0.1; 1536], 5, None).await?;
//! println!("{} matches", matches.matches.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod index;
pub mod readiness;

mod transport;

pub use api::{
    FetchResponse, IndexDescription, IndexState, Metric, QueryMatch, QueryResponse, RestApi,
    SparseValues, UpsertResponse, Vector,
};
pub use client::{Client, ClientEvent, UseIndexOptions};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result};
pub use index::Index;
pub use readiness::{wait_until_ready, DescribeIndex, ReadinessConfig};

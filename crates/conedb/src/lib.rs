//! # ConeDB
//!
//! Async Rust SDK for Pinecone-style vector database APIs.
//!
//! This crate provides a unified API for the ConeDB ecosystem, re-exporting
//! commonly used types from [`conedb_core`] and [`conedb_client`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use conedb::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), conedb::Error> {
//!     let client = Client::from_env()?;
//!
//!     let index = client
//!         .use_index("articles", UseIndexOptions::default().create_if_missing())
//!         .await?;
//!
//!     index
//!         .upsert(vec![Vector::new("a1", vec![0.1; 1536])], None)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

// Re-export core crate
pub use conedb_core as core;

/// Typed event emitter.
pub mod events {
    pub use conedb_core::events::*;
}

/// Event metadata primitives.
pub mod types {
    pub use conedb_core::types::*;
}

// Re-export client crate
pub use conedb_client as client;

pub use conedb_client::{
    Client, ClientConfig, ClientEvent, Error, Index, Metric, ReadinessConfig, Result,
    UseIndexOptions, Vector,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use conedb::prelude::*;
/// ```
pub mod prelude {
    pub use conedb_client::{
        Client, ClientConfig, ClientEvent, Index, Metric, UseIndexOptions, Vector,
    };
    pub use conedb_core::events::Emitter;
    pub use conedb_core::types::{metadata, MetaValue, Metadata};
}

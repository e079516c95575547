//! Environment-variable helpers
//!
//! Well-known variable names consumed by the SDK plus small lookup helpers.
//! The client never mutates process-wide state; these are plain reads.

/// API key for the vector-database controller.
pub const API_KEY: &str = "CONEDB_API_KEY";
/// Controller environment name (e.g. `us-west4-gcp-free`).
pub const ENVIRONMENT: &str = "CONEDB_ENV";
/// Default index name.
pub const INDEX: &str = "CONEDB_INDEX";
/// Default index dimensionality.
pub const DEFAULT_DIMENSION: &str = "CONEDB_DEF_DIM";

/// Read an environment variable, treating empty values as unset.
pub fn get_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

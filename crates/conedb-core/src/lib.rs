//! # conedb-core — Shared Core
//!
//! Dependency-light building blocks used across the ConeDB SDK:
//!
//! - [`events`] — a typed, synchronous event emitter with per-type
//!   mute/unmute and a transform/veto filter chain
//! - [`types`] — flat metadata primitives attached to emitted events
//! - [`env`] — environment-variable helpers and the well-known
//!   `CONEDB_*` variable names

pub mod env;
pub mod events;
pub mod types;

pub use events::{Emitter, Event};
pub use types::{MetaValue, Metadata};

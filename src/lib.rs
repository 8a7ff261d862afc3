//! # Rift Tracker
//!
//! A League of Legends stats backend with incremental cache refresh.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (match records, stat buckets, snapshots)
//! - **source**: Upstream match data access (Riot API client)
//! - **cache**: Snapshot persistence (file-backed and in-memory)
//! - **calculate**: Aggregation and snapshot merging
//! - **service**: Cached stats orchestration (freshness, delta refresh)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod cache;
pub mod calculate;
pub mod config;
pub mod models;
pub mod service;
pub mod source;

pub use models::*;

#[cfg(test)]
pub(crate) mod testing;

//! Cached aggregate snapshots.
//!
//! A [`CacheGateway`] is a plain get/set/del over string keys; merge
//! semantics live entirely in the orchestrator, a `set` always
//! overwrites. The production gateway keeps one JSON envelope file per
//! key under the data directory.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::models::StatsSnapshot;

/// Errors from the cache layer.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Cache key for a player's stats snapshot: `{server}:{alias}:stats`,
/// case-normalized.
pub fn stats_key(server: &str, alias: &str) -> String {
    format!("{}:{}:stats", server, alias).to_lowercase()
}

/// Key-value store for stats snapshots.
#[async_trait]
pub trait CacheGateway: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<StatsSnapshot>, CacheError>;

    /// Overwrite the snapshot stored under `key`.
    async fn set(&self, key: &str, snapshot: &StatsSnapshot) -> Result<(), CacheError>;

    /// Remove a key. Returns whether it existed.
    async fn del(&self, key: &str) -> Result<bool, CacheError>;

    /// All keys currently stored.
    async fn keys(&self) -> Result<Vec<String>, CacheError>;
}

/// What actually sits in a cache file: the snapshot plus enough
/// metadata to list keys without a reverse hash lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEnvelope {
    key: String,
    cached_at: DateTime<Utc>,
    snapshot: StatsSnapshot,
}

/// File-backed cache: one JSON file per key, named by key hash.
pub struct FileCacheGateway {
    dir: PathBuf,
}

impl FileCacheGateway {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{}.json", &hex::encode(digest)[..16]))
    }
}

#[async_trait]
impl CacheGateway for FileCacheGateway {
    async fn get(&self, key: &str) -> Result<Option<StatsSnapshot>, CacheError> {
        let key = key.to_lowercase();
        let path = self.path_for(&key);

        let content = match fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // An unreadable envelope is treated as a miss, not an error;
        // the orchestrator will rebuild and overwrite it.
        match serde_json::from_str::<CacheEnvelope>(&content) {
            Ok(envelope) => {
                debug!(key, "cache hit");
                Ok(Some(envelope.snapshot))
            }
            Err(e) => {
                debug!(key, error = %e, "discarding unreadable cache entry");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, snapshot: &StatsSnapshot) -> Result<(), CacheError> {
        let key = key.to_lowercase();
        fs::create_dir_all(&self.dir).await?;

        let envelope = CacheEnvelope {
            key: key.clone(),
            cached_at: Utc::now(),
            snapshot: snapshot.clone(),
        };
        let json = serde_json::to_string(&envelope)?;
        fs::write(self.path_for(&key), json).await?;
        debug!(key, games = snapshot.games(), "cache write");
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool, CacheError> {
        let key = key.to_lowercase();
        match fs::remove_file(self.path_for(&key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().extension().is_some_and(|e| e == "json") {
                let content = fs::read_to_string(entry.path()).await?;
                if let Ok(envelope) = serde_json::from_str::<CacheEnvelope>(&content) {
                    keys.push(envelope.key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// In-process cache, used in tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryCacheGateway {
    entries: tokio::sync::RwLock<BTreeMap<String, StatsSnapshot>>,
}

#[async_trait]
impl CacheGateway for MemoryCacheGateway {
    async fn get(&self, key: &str) -> Result<Option<StatsSnapshot>, CacheError> {
        Ok(self.entries.read().await.get(&key.to_lowercase()).cloned())
    }

    async fn set(&self, key: &str, snapshot: &StatsSnapshot) -> Result<(), CacheError> {
        self.entries
            .write()
            .await
            .insert(key.to_lowercase(), snapshot.clone());
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self
            .entries
            .write()
            .await
            .remove(&key.to_lowercase())
            .is_some())
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}

//! Stats orchestration.
//!
//! `StatsService` decides, per request, whether the cached snapshot is
//! still current, and if not fetches only the matches missing from its
//! ledger before merging. Failures from the collaborators propagate
//! unmodified; the service performs no retries.
//!
//! Concurrent refreshes for the same player-server key are not
//! serialized: both callers read the same stale snapshot and the last
//! write wins. Acceptable for a cache of derived data that the next
//! request rebuilds correctly.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{stats_key, CacheError, CacheGateway};
use crate::calculate;
use crate::models::{MatchRecord, Queue, StatsSnapshot};
use crate::source::{MatchSource, SourceError};

/// Default bounded-window width: how many matches a fresh snapshot
/// tracks, and the page size used when probing for new matches.
pub const DEFAULT_WINDOW: usize = 10;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Orchestrates match fetching, aggregation and cache refresh.
pub struct StatsService {
    source: Arc<dyn MatchSource>,
    cache: Arc<dyn CacheGateway>,
    window: usize,
}

impl StatsService {
    pub fn new(source: Arc<dyn MatchSource>, cache: Arc<dyn CacheGateway>, window: usize) -> Self {
        Self {
            source,
            cache,
            window,
        }
    }

    /// Aggregate stats for a player, served from cache when current.
    ///
    /// Cache miss (or corrupt ledger) rebuilds from the newest `window`
    /// matches. A stale hit fetches only the missing matches and merges
    /// them in, unless the probe page shares no ID with the ledger, in
    /// which case the cache is too far behind to extend and is replaced
    /// outright (bounded-window policy).
    pub async fn get_stats(&self, server: &str, alias: &str) -> Result<StatsSnapshot, ServiceError> {
        let key = stats_key(server, alias);

        if let Some(cached) = self.cache.get(&key).await? {
            if cached.has_duplicate_games() {
                warn!(key, "cached ledger contains duplicate match ids, rebuilding");
            } else if let Some(snapshot) = self.refresh(server, alias, &key, cached).await? {
                return Ok(snapshot);
            }
        }

        self.rebuild(server, alias, &key).await
    }

    /// Grow the tracked window: refresh, then fold in the next page of
    /// older matches past the current ledger.
    pub async fn add_stats(&self, server: &str, alias: &str) -> Result<StatsSnapshot, ServiceError> {
        let key = stats_key(server, alias);
        let current = self.get_stats(server, alias).await?;

        let info = self.source.get_basic_info(server, alias).await?;
        let ids = self
            .source
            .get_game_ids(&info.puuid, server, self.window, current.games(), Queue::All)
            .await?;

        // Offset paging should already exclude ledger entries; filter
        // anyway so the merge disjointness precondition always holds.
        let fresh: Vec<String> = ids
            .into_iter()
            .filter(|id| !current.contains_game(id))
            .collect();

        info!(key, extra = fresh.len(), "extending tracked match window");
        let delta = calculate::aggregate(&self.fetch_details(&info.puuid, server, &fresh).await?);
        let merged = calculate::merge(&current, &delta);

        self.cache.set(&key, &merged).await?;
        Ok(merged)
    }

    /// Try to serve from the cached snapshot, refreshing it if stale.
    ///
    /// Returns `None` when the snapshot cannot be extended and the
    /// caller must rebuild from scratch.
    async fn refresh(
        &self,
        server: &str,
        alias: &str,
        key: &str,
        cached: StatsSnapshot,
    ) -> Result<Option<StatsSnapshot>, ServiceError> {
        let Some(newest) = cached.newest_game() else {
            return Ok(None);
        };

        let info = self.source.get_basic_info(server, alias).await?;
        let check = self.source.is_last_game(server, &info.puuid, newest).await?;
        if check.is_last {
            info!(key, last_game = %check.last_game_id, "cache is current, serving cached stats");
            return Ok(Some(cached));
        }

        let ids = self
            .source
            .get_game_ids(&info.puuid, server, self.window, 0, Queue::All)
            .await?;
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !cached.contains_game(id))
            .cloned()
            .collect();

        // No overlap between the probe page and the ledger: more than a
        // full window has elapsed, continuity can't be proven, so the
        // old snapshot is dropped rather than extended.
        if !ids.is_empty() && missing.len() == ids.len() {
            info!(
                key,
                window = self.window,
                "cache too far behind, replacing with fresh window"
            );
            return Ok(None);
        }

        info!(key, delta = missing.len(), "folding new matches into cached stats");
        let delta = calculate::aggregate(&self.fetch_details(&info.puuid, server, &missing).await?);
        // Disjoint by construction: ledger IDs were filtered out above.
        let merged = calculate::merge(&delta, &cached);

        self.cache.set(key, &merged).await?;
        Ok(Some(merged))
    }

    /// Build a fresh snapshot from the newest `window` matches.
    async fn rebuild(&self, server: &str, alias: &str, key: &str) -> Result<StatsSnapshot, ServiceError> {
        let info = self.source.get_basic_info(server, alias).await?;
        let ids = self
            .source
            .get_game_ids(&info.puuid, server, self.window, 0, Queue::All)
            .await?;

        info!(key, games = ids.len(), "building stats snapshot from scratch");
        let snapshot = calculate::aggregate(&self.fetch_details(&info.puuid, server, &ids).await?);

        self.cache.set(key, &snapshot).await?;
        Ok(snapshot)
    }

    async fn fetch_details(
        &self,
        puuid: &str,
        server: &str,
        match_ids: &[String],
    ) -> Result<Vec<MatchRecord>, ServiceError> {
        if match_ids.is_empty() {
            debug!("no match details to fetch");
            return Ok(Vec::new());
        }
        Ok(self.source.get_games_detail(puuid, server, match_ids).await?)
    }
}

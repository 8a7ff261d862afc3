//! Upstream match data source.
//!
//! The orchestrator and the HTTP layer only ever talk to the
//! [`MatchSource`] trait; the production implementation
//! ([`RiotMatchSource`]) wraps the Riot Games API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ChampionMastery, MatchRecord, Queue};

pub mod riot;

pub use riot::{RiotClientConfig, RiotMatchSource};

/// Errors from the upstream data source.
///
/// These propagate unmodified through the orchestrator; no retries are
/// attempted above this layer.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("player not found: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("rate limited by upstream, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identity data for a summoner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicInfo {
    pub id: String,
    pub puuid: String,
    pub name: String,
    pub summoner_level: u32,
    pub profile_icon_id: i32,
}

/// Result of asking the source whether a match is still the latest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastGameCheck {
    pub is_last: bool,
    pub last_game_id: String,
}

/// Read access to a player's match history.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Resolve a summoner alias to identity data.
    async fn get_basic_info(&self, server: &str, alias: &str) -> Result<BasicInfo, SourceError>;

    /// Match IDs for a player, newest first.
    ///
    /// The newest-first ordering is a contract of this interface: the
    /// staleness check and the snapshot ledger both depend on it.
    async fn get_game_ids(
        &self,
        puuid: &str,
        server: &str,
        limit: usize,
        offset: usize,
        queue: Queue,
    ) -> Result<Vec<String>, SourceError>;

    /// Full detail for the given match IDs, in the order requested.
    async fn get_games_detail(
        &self,
        puuid: &str,
        server: &str,
        match_ids: &[String],
    ) -> Result<Vec<MatchRecord>, SourceError>;

    /// Whether `candidate` is still the player's most recent match.
    async fn is_last_game(
        &self,
        server: &str,
        puuid: &str,
        candidate: &str,
    ) -> Result<LastGameCheck, SourceError>;

    /// Top champion masteries for a summoner.
    async fn get_masteries(
        &self,
        server: &str,
        alias: &str,
        limit: usize,
    ) -> Result<Vec<ChampionMastery>, SourceError>;
}

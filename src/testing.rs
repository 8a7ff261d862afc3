//! Shared test fixtures: a scriptable in-memory match source.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{ChampionMastery, MatchRecord, Position, Queue};
use crate::source::{BasicInfo, LastGameCheck, MatchSource, SourceError};

/// Build a match record with sane defaults for tests.
pub fn match_record(id: &str, champion: &str, kills: u32, win: bool) -> MatchRecord {
    MatchRecord {
        match_id: id.to_string(),
        champion: champion.to_string(),
        position: Position::Middle,
        kills,
        deaths: 2,
        assists: 4,
        cs: 150,
        gold: 10_000,
        damage_dealt: 18_000,
        damage_taken: 12_000,
        vision_score: 15,
        double_kills: 0,
        triple_kills: 0,
        quadra_kills: 0,
        penta_kills: 0,
        game_duration_secs: 1600,
        win,
        friends: vec!["Teammate".to_string()],
    }
}

/// A [`MatchSource`] backed by an in-memory match history.
///
/// History is newest first, matching the upstream ordering contract.
/// Every detail fetch is recorded so tests can assert exactly which
/// matches were requested.
pub struct MockMatchSource {
    history: Mutex<Vec<MatchRecord>>,
    pub detail_requests: Mutex<Vec<Vec<String>>>,
}

impl MockMatchSource {
    pub fn new(history: Vec<MatchRecord>) -> Self {
        Self {
            history: Mutex::new(history),
            detail_requests: Mutex::new(Vec::new()),
        }
    }

    /// Record a newly played match (becomes the newest).
    pub fn push_newest(&self, record: MatchRecord) {
        self.history.lock().unwrap().insert(0, record);
    }

    pub fn detail_request_count(&self) -> usize {
        self.detail_requests.lock().unwrap().len()
    }

    pub fn last_detail_request(&self) -> Option<Vec<String>> {
        self.detail_requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MatchSource for MockMatchSource {
    async fn get_basic_info(&self, server: &str, alias: &str) -> Result<BasicInfo, SourceError> {
        if alias == "missing" {
            return Err(SourceError::NotFound(format!("{}:{}", server, alias)));
        }
        Ok(BasicInfo {
            id: "summoner-id".to_string(),
            puuid: "test-puuid".to_string(),
            name: alias.to_string(),
            summoner_level: 100,
            profile_icon_id: 1234,
        })
    }

    async fn get_game_ids(
        &self,
        _puuid: &str,
        _server: &str,
        limit: usize,
        offset: usize,
        _queue: Queue,
    ) -> Result<Vec<String>, SourceError> {
        let history = self.history.lock().unwrap();
        Ok(history
            .iter()
            .skip(offset)
            .take(limit)
            .map(|m| m.match_id.clone())
            .collect())
    }

    async fn get_games_detail(
        &self,
        _puuid: &str,
        _server: &str,
        match_ids: &[String],
    ) -> Result<Vec<MatchRecord>, SourceError> {
        self.detail_requests
            .lock()
            .unwrap()
            .push(match_ids.to_vec());

        let history = self.history.lock().unwrap();
        Ok(match_ids
            .iter()
            .filter_map(|id| history.iter().find(|m| &m.match_id == id).cloned())
            .collect())
    }

    async fn is_last_game(
        &self,
        _server: &str,
        _puuid: &str,
        candidate: &str,
    ) -> Result<LastGameCheck, SourceError> {
        let history = self.history.lock().unwrap();
        let last_game_id = history
            .first()
            .map(|m| m.match_id.clone())
            .unwrap_or_default();
        Ok(LastGameCheck {
            is_last: last_game_id == candidate,
            last_game_id,
        })
    }

    async fn get_masteries(
        &self,
        _server: &str,
        alias: &str,
        limit: usize,
    ) -> Result<Vec<ChampionMastery>, SourceError> {
        if alias == "missing" {
            return Err(SourceError::NotFound(alias.to_string()));
        }
        let all = vec![
            ChampionMastery {
                champion_id: 103,
                level: 7,
                points: 250_000,
            },
            ChampionMastery {
                champion_id: 238,
                level: 5,
                points: 60_000,
            },
        ];
        Ok(all.into_iter().take(limit).collect())
    }
}

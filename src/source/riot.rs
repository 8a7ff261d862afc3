//! Riot Games API client.
//!
//! Thin HTTP wrapper that maps Riot's summoner-v4, match-v5 and
//! champion-mastery-v4 endpoints onto the [`MatchSource`] trait.
//! Platform hosts (`euw1`, `na1`, ...) serve summoner data; match data
//! lives on regional routing hosts (`europe`, `americas`, ...).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{ChampionMastery, MatchRecord, Position, Queue};

use super::{BasicInfo, LastGameCheck, MatchSource, SourceError};

/// Configuration for the Riot API client.
#[derive(Debug, Clone)]
pub struct RiotClientConfig {
    /// Riot API key, sent as the `X-Riot-Token` header.
    pub api_key: String,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl Default for RiotClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout: Duration::from_secs(10),
            user_agent: format!("rift-tracker/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Map a platform server to its regional routing host.
///
/// Match-v5 endpoints are only served from the regional hosts.
pub fn regional_routing(server: &str) -> &'static str {
    match server {
        "na1" | "br1" | "la1" | "la2" | "oc1" => "americas",
        "euw1" | "eun1" | "tr1" | "ru" => "europe",
        "kr" | "jp1" => "asia",
        "ph2" | "sg2" | "th2" | "tw2" | "vn2" => "sea",
        _ => "europe",
    }
}

/// Production [`MatchSource`] backed by the Riot Games API.
pub struct RiotMatchSource {
    client: Client,
    api_key: String,
}

impl RiotMatchSource {
    pub fn new(config: RiotClientConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("rift-tracker/0.1.0")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        debug!(url, "riot api request");
        let response = self
            .client
            .get(url)
            .header("X-Riot-Token", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(SourceError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl MatchSource for RiotMatchSource {
    async fn get_basic_info(&self, server: &str, alias: &str) -> Result<BasicInfo, SourceError> {
        let url = format!(
            "https://{}.api.riotgames.com/lol/summoner/v4/summoners/by-name/{}",
            server, alias
        );

        match self.get_json::<SummonerDto>(&url).await {
            Ok(dto) => Ok(BasicInfo {
                id: dto.id,
                puuid: dto.puuid,
                name: if dto.name.is_empty() {
                    alias.to_string()
                } else {
                    dto.name
                },
                summoner_level: dto.summoner_level,
                profile_icon_id: dto.profile_icon_id,
            }),
            Err(SourceError::HttpStatus { status: 404, .. }) => {
                Err(SourceError::NotFound(format!("{}:{}", server, alias)))
            }
            Err(e) => Err(e),
        }
    }

    async fn get_game_ids(
        &self,
        puuid: &str,
        server: &str,
        limit: usize,
        offset: usize,
        queue: Queue,
    ) -> Result<Vec<String>, SourceError> {
        let mut url = format!(
            "https://{}.api.riotgames.com/lol/match/v5/matches/by-puuid/{}/ids?start={}&count={}",
            regional_routing(server),
            puuid,
            offset,
            limit
        );
        match queue {
            Queue::All => {}
            Queue::Ranked => url.push_str("&type=ranked"),
            Queue::Normal => url.push_str("&type=normal"),
        }

        self.get_json(&url).await
    }

    async fn get_games_detail(
        &self,
        puuid: &str,
        server: &str,
        match_ids: &[String],
    ) -> Result<Vec<MatchRecord>, SourceError> {
        let routing = regional_routing(server);
        let mut records = Vec::with_capacity(match_ids.len());

        for match_id in match_ids {
            let url = format!(
                "https://{}.api.riotgames.com/lol/match/v5/matches/{}",
                routing, match_id
            );
            let dto: MatchDto = self.get_json(&url).await?;
            match match_record_from_dto(dto, puuid) {
                Some(record) => records.push(record),
                None => warn!(match_id, "tracked player missing from match, skipping"),
            }
        }

        Ok(records)
    }

    async fn is_last_game(
        &self,
        server: &str,
        puuid: &str,
        candidate: &str,
    ) -> Result<LastGameCheck, SourceError> {
        let ids = self.get_game_ids(puuid, server, 1, 0, Queue::All).await?;
        let last_game_id = ids.into_iter().next().unwrap_or_default();

        Ok(LastGameCheck {
            is_last: last_game_id == candidate,
            last_game_id,
        })
    }

    async fn get_masteries(
        &self,
        server: &str,
        alias: &str,
        limit: usize,
    ) -> Result<Vec<ChampionMastery>, SourceError> {
        let info = self.get_basic_info(server, alias).await?;
        let url = format!(
            "https://{}.api.riotgames.com/lol/champion-mastery/v4/champion-masteries/by-puuid/{}/top?count={}",
            server, info.puuid, limit
        );

        let dtos: Vec<MasteryDto> = self.get_json(&url).await?;
        Ok(dtos
            .into_iter()
            .map(|m| ChampionMastery {
                champion_id: m.champion_id,
                level: m.champion_level,
                points: m.champion_points,
            })
            .collect())
    }
}

// ── Riot wire DTOs ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummonerDto {
    #[serde(default)]
    id: String,
    puuid: String,
    #[serde(default)]
    name: String,
    summoner_level: u32,
    #[serde(default)]
    profile_icon_id: i32,
}

#[derive(Debug, Deserialize)]
struct MatchDto {
    metadata: MatchMetadataDto,
    info: MatchInfoDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchMetadataDto {
    match_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchInfoDto {
    game_duration: i64,
    participants: Vec<ParticipantDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantDto {
    puuid: String,
    champion_name: String,
    team_id: i32,
    win: bool,
    #[serde(default)]
    team_position: String,
    #[serde(default)]
    kills: u32,
    #[serde(default)]
    deaths: u32,
    #[serde(default)]
    assists: u32,
    #[serde(default)]
    total_minions_killed: u32,
    #[serde(default)]
    neutral_minions_killed: u32,
    #[serde(default)]
    gold_earned: u32,
    #[serde(default)]
    total_damage_dealt_to_champions: u32,
    #[serde(default)]
    total_damage_taken: u32,
    #[serde(default)]
    vision_score: u32,
    #[serde(default)]
    double_kills: u32,
    #[serde(default)]
    triple_kills: u32,
    #[serde(default)]
    quadra_kills: u32,
    #[serde(default)]
    penta_kills: u32,
    #[serde(default)]
    riot_id_game_name: String,
    #[serde(default)]
    summoner_name: String,
}

impl ParticipantDto {
    fn display_name(&self) -> &str {
        if self.riot_id_game_name.is_empty() {
            &self.summoner_name
        } else {
            &self.riot_id_game_name
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MasteryDto {
    champion_id: i64,
    champion_level: u32,
    champion_points: u64,
}

/// Reduce a full match payload to the tracked player's record.
///
/// Returns `None` when the player is absent from the participant list
/// (spectated or corrupt payload).
fn match_record_from_dto(dto: MatchDto, puuid: &str) -> Option<MatchRecord> {
    let me = dto.info.participants.iter().find(|p| p.puuid == puuid)?;

    let friends = dto
        .info
        .participants
        .iter()
        .filter(|p| p.team_id == me.team_id && p.puuid != puuid)
        .map(|p| p.display_name().to_string())
        .collect();

    Some(MatchRecord {
        match_id: dto.metadata.match_id,
        champion: me.champion_name.clone(),
        position: Position::from_riot(&me.team_position),
        kills: me.kills,
        deaths: me.deaths,
        assists: me.assists,
        cs: me.total_minions_killed + me.neutral_minions_killed,
        gold: me.gold_earned,
        damage_dealt: me.total_damage_dealt_to_champions,
        damage_taken: me.total_damage_taken,
        vision_score: me.vision_score,
        double_kills: me.double_kills,
        triple_kills: me.triple_kills,
        quadra_kills: me.quadra_kills,
        penta_kills: me.penta_kills,
        game_duration_secs: dto.info.game_duration.max(0) as u32,
        win: me.win,
        friends,
    })
}

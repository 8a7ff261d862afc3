//! Summoner endpoints: profile, masteries, match history and the
//! cached aggregate stats.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{ChampionMastery, MatchRecord, Queue, StatsSnapshot, SummonerProfile};

/// `GET /api/summoners/:server/:alias`
pub async fn profile(
    State(state): State<AppState>,
    Path((server, alias)): Path<(String, String)>,
) -> Result<Json<SummonerProfile>, ApiError> {
    let info = state.source.get_basic_info(&server, &alias).await?;

    Ok(Json(SummonerProfile::new(
        info.name,
        server,
        info.summoner_level,
        info.profile_icon_id,
        &state.config.riot.ddragon_version,
    )))
}

#[derive(Debug, Deserialize)]
pub struct MasteriesParams {
    pub limit: Option<usize>,
}

/// `GET /api/summoners/:server/:alias/masteries`
pub async fn masteries(
    State(state): State<AppState>,
    Path((server, alias)): Path<(String, String)>,
    Query(params): Query<MasteriesParams>,
) -> Result<Json<Vec<ChampionMastery>>, ApiError> {
    let limit = params.limit.unwrap_or(5).clamp(1, 20);
    let masteries = state.source.get_masteries(&server, &alias, limit).await?;
    Ok(Json(masteries))
}

#[derive(Debug, Deserialize)]
pub struct GamesParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    #[serde(default)]
    pub queue: Queue,
}

/// `GET /api/summoners/:server/:alias/games`
///
/// Raw match records, straight from the upstream source (no caching).
pub async fn games(
    State(state): State<AppState>,
    Path((server, alias)): Path<(String, String)>,
    Query(params): Query<GamesParams>,
) -> Result<Json<Vec<MatchRecord>>, ApiError> {
    let limit = params.limit.unwrap_or(10).clamp(1, 50);
    let offset = params.offset.unwrap_or(0);

    let info = state.source.get_basic_info(&server, &alias).await?;
    let ids = state
        .source
        .get_game_ids(&info.puuid, &server, limit, offset, params.queue)
        .await?;
    let records = state.source.get_games_detail(&info.puuid, &server, &ids).await?;

    Ok(Json(records))
}

/// `GET /api/summoners/:server/:alias/stats`
pub async fn stats(
    State(state): State<AppState>,
    Path((server, alias)): Path<(String, String)>,
) -> Result<Json<StatsSnapshot>, ApiError> {
    Ok(Json(state.service.get_stats(&server, &alias).await?))
}

/// `GET /api/summoners/:server/:alias/stats/add`
pub async fn add_stats(
    State(state): State<AppState>,
    Path((server, alias)): Path<(String, String)>,
) -> Result<Json<StatsSnapshot>, ApiError> {
    Ok(Json(state.service.add_stats(&server, &alias).await?))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::api::state::AppState;
    use crate::api::build_router;
    use crate::cache::MemoryCacheGateway;
    use crate::config::AppConfig;
    use crate::models::MatchRecord;
    use crate::service::StatsService;
    use crate::testing::{match_record, MockMatchSource};

    pub(crate) fn test_state(history: Vec<MatchRecord>) -> (AppState, Arc<MockMatchSource>) {
        let source = Arc::new(MockMatchSource::new(history));
        let cache = Arc::new(MemoryCacheGateway::default());
        let mut config = AppConfig::default();
        config.stats.window = 5;

        let state = AppState {
            service: Arc::new(StatsService::new(
                source.clone(),
                cache.clone(),
                config.stats.window,
            )),
            source: source.clone(),
            cache,
            config: Arc::new(config),
        };
        (state, source)
    }

    pub(crate) async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn history(count: usize) -> Vec<MatchRecord> {
        (0..count)
            .map(|i| {
                let n = count - i;
                match_record(&format!("M{}", n), "Ahri", n as u32, true)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_profile() {
        let (state, _) = test_state(history(3));
        let app = build_router(state);

        let (status, json) = get_json(app, "/api/summoners/euw1/Player").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["alias"], "Player");
        assert_eq!(json["server"], "euw1");
        assert_eq!(json["level"], 100);
        assert!(json["image"]
            .as_str()
            .unwrap()
            .contains("/img/profileicon/1234.png"));
    }

    #[tokio::test]
    async fn test_profile_unknown_player_is_404() {
        let (state, _) = test_state(history(3));
        let app = build_router(state);

        let (status, json) = get_json(app, "/api/summoners/euw1/missing").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_masteries_respects_limit() {
        let (state, _) = test_state(history(3));
        let app = build_router(state);

        let (status, json) = get_json(app, "/api/summoners/euw1/Player/masteries?limit=1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["champion_id"], 103);
    }

    #[tokio::test]
    async fn test_games_passthrough() {
        let (state, _) = test_state(history(8));
        let app = build_router(state);

        let (status, json) =
            get_json(app, "/api/summoners/euw1/Player/games?limit=2&offset=1").await;

        assert_eq!(status, StatusCode::OK);
        let games = json.as_array().unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0]["match_id"], "M7");
        assert_eq!(games[1]["match_id"], "M6");
    }

    #[tokio::test]
    async fn test_stats_builds_and_caches() {
        let (state, source) = test_state(history(8));
        let app = build_router(state.clone());

        let (status, json) = get_json(app, "/api/summoners/euw1/Player/stats").await;

        assert_eq!(status, StatusCode::OK);
        let games_used = json["games_used"].as_array().unwrap();
        assert_eq!(games_used.len(), 5);
        assert_eq!(games_used[0], "M8");
        assert_eq!(json["by_champion"]["Ahri"]["games"], 5);

        // Second request is served from cache.
        let app = build_router(state);
        let (status, _) = get_json(app, "/api/summoners/euw1/Player/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(source.detail_request_count(), 1);
    }

    #[tokio::test]
    async fn test_add_stats_grows_window() {
        let (state, _) = test_state(history(8));

        let app = build_router(state.clone());
        let (status, json) = get_json(app, "/api/summoners/euw1/Player/stats/add").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["games_used"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_stats_unknown_player_is_404() {
        let (state, _) = test_state(history(3));
        let app = build_router(state);

        let (status, json) = get_json(app, "/api/summoners/euw1/missing/stats").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = test_state(Vec::new());
        let app = build_router(state);

        let (status, json) = get_json(app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }
}

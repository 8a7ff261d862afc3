use std::sync::Arc;

use crate::cache::CacheGateway;
use crate::config::AppConfig;
use crate::service::StatsService;
use crate::source::MatchSource;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StatsService>,
    pub source: Arc<dyn MatchSource>,
    pub cache: Arc<dyn CacheGateway>,
    pub config: Arc<AppConfig>,
}

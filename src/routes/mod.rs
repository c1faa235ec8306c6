// HTTP routes: status view, history series, version

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::capacity::CapacityService;
use crate::clock::Clock;
use crate::config::AppConfig;
use crate::feed_repo::FeedRepo;
use crate::history_service::HistoryService;
use crate::status::EngineSettings;

#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<FeedRepo>,
    pub capacity: Arc<CapacityService>,
    pub history: Arc<HistoryService>,
    pub settings: Arc<EngineSettings>,
    pub clock: Arc<dyn Clock>,
    pub default_queue: String,
}

impl AppState {
    /// Wires the feed client, capacity cache and history sampler from config.
    pub fn new(config: &AppConfig, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let settings = Arc::new(config.engine_settings()?);
        let feed = Arc::new(FeedRepo::new(&config.feed, &config.capacity)?);
        let capacity = Arc::new(CapacityService::new(
            feed.clone(),
            clock.clone(),
            &config.capacity,
        ));
        let history = Arc::new(HistoryService::new(
            feed.clone(),
            clock.clone(),
            settings.clone(),
            &config.history,
        ));
        Ok(Self {
            feed,
            capacity,
            history,
            settings,
            clock,
            default_queue: config.queues.default.clone(),
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::status_handler)) // GET /?queue=&filter=
        .route("/api/status", get(http::status_handler)) // GET /api/status?queue=&filter=
        .route("/api/history", get(http::history_handler)) // GET /api/history
        .route("/version", get(http::version_handler)) // GET /version
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

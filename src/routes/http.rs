// GET handlers: status, history, version

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::AppState;
use crate::error::{AggregationError, FetchError, MalformedSnapshot};
use crate::models::{HistorySample, ViewModel};
use crate::status::{self, QueueSelector, StatusQuery};
use crate::version::{NAME, VERSION};

#[derive(Debug, Deserialize)]
pub(super) struct StatusParams {
    /// Pipeline name or "all"; empty or missing uses the configured default.
    queue: Option<String>,
    filter: Option<String>,
}

/// GET / and /api/status: the aggregated view for one queue (or all known queues).
pub(super) async fn status_handler(
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> Result<Json<ViewModel>, AggregationError> {
    let queue = params
        .queue
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| state.default_queue.clone());
    let selector = QueueSelector::from_param(&queue);

    let doc = state.feed.fetch_status().await?;

    let capacity = if state.settings.rate_based_queue.is_some() {
        state.capacity.max_capacity().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "max_capacity", "capacity unavailable; rate-based ETC unknown");
            None
        })
    } else {
        None
    };

    // The fetched document doubles as a history sample when the window is open.
    if let Err(e) = state.history.record_snapshot(&doc).await {
        tracing::warn!(error = %e, operation = "record_snapshot", "history sample skipped");
    }

    let query = StatusQuery {
        selector: &selector,
        filter: params.filter.as_deref().unwrap_or(""),
        capacity,
        now: state.clock.now_utc(),
    };
    let view = status::compute_status_view(&doc, &query, &state.settings)?;
    tracing::debug!(
        queue = %queue,
        changes = view.changes.len(),
        total = view.counts.total,
        "status view computed"
    );
    Ok(Json(view))
}

/// GET /api/history: samples for the chart, refreshed first if the window has elapsed.
pub(super) async fn history_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistorySample>>, AggregationError> {
    state.history.refresh().await.map(Json)
}

/// GET /version: service name and version.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

impl IntoResponse for AggregationError {
    fn into_response(self) -> Response {
        let status = match &self {
            AggregationError::Malformed(MalformedSnapshot::UnknownQueue(_)) => {
                StatusCode::NOT_FOUND
            }
            AggregationError::Fetch(FetchError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            AggregationError::Fetch(_)
            | AggregationError::Parse(_)
            | AggregationError::Malformed(_) => StatusCode::BAD_GATEWAY,
        };
        tracing::info!(error = %self, status = status.as_u16(), "request failed");
        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "code": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

//! Cache Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{ApiResponse, CacheStatsResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn cache_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<CacheStatsResponse>>, ApiError> {
    let stats = state.artifact_cache.stats().await?;

    Ok(Json(ApiResponse::success(CacheStatsResponse {
        entries: stats.total_entries,
        total_bytes: stats.total_size_bytes,
        in_flight: state.inflight.as_ref().map_or(0, |i| i.in_flight()),
        fingerprint: state.artifact_cache.scope(),
    })))
}

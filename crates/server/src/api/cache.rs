use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use reconciler_core::{MediaCriteria, TorrentItem};

use super::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub media: MediaCriteria,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub items: Vec<TorrentItem>,
}

/// POST /api/v1/cache/lookup
pub async fn lookup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<LookupResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Some(cache) = state.cache() else {
        return Err(error_response(
            StatusCode::NOT_FOUND,
            "Result cache is disabled",
        ));
    };

    let items = cache.lookup(&request.media).await.map_err(|e| {
        error!("Cache lookup failed for {}: {}", request.media.cache_key(), e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
    })?;

    Ok(Json(LookupResponse { items }))
}

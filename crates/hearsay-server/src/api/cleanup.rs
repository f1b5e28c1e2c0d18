//! Age-based cleanup trigger with dry-run support.

use axum::{extract::State, Extension, Json};
use hearsay_db::{CleanupOutcome, MentionStats};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_DAYS_TO_KEEP: i64 = 30;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct CleanupRequest {
    pub days_to_keep: Option<i64>,
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct CleanupResponse {
    #[serde(flatten)]
    pub outcome: CleanupOutcome,
    pub stats_before: MentionStats,
    pub stats_after: MentionStats,
}

pub(super) async fn run_cleanup(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Option<Json<CleanupRequest>>,
) -> Result<Json<ApiResponse<CleanupResponse>>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let days_to_keep = request.days_to_keep.unwrap_or(DEFAULT_DAYS_TO_KEEP);
    if days_to_keep < 1 {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "days_to_keep must be at least 1",
        ));
    }

    let stats_before = hearsay_db::mention_stats(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let outcome = hearsay_db::run_cleanup(&state.pool, days_to_keep, request.dry_run)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let stats_after = hearsay_db::mention_stats(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: CleanupResponse {
            outcome,
            stats_before,
            stats_after,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

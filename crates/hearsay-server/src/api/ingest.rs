//! Manual ingestion triggers. The same runs execute on the cron
//! schedule; these routes exist for operators and external schedulers.

use axum::{extract::State, Extension, Json};
use hearsay_ingest::{IngestError, RunSummary};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

fn map_ingest_error(request_id: String, error: &IngestError) -> ApiError {
    tracing::error!(error = %error, "ingestion run failed during setup");
    match error {
        IngestError::Config(message) => {
            ApiError::new(request_id, "config_error", message.clone())
        }
        IngestError::Db(_) => ApiError::new(request_id, "internal_error", "database unavailable"),
        _ => ApiError::new(request_id, "internal_error", error.to_string()),
    }
}

pub(super) async fn run_reddit(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<RunSummary>>, ApiError> {
    let summary = hearsay_ingest::run_reddit_ingestion(&state.pool, &state.config)
        .await
        .map_err(|e| map_ingest_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: summary,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn run_hackernews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<RunSummary>>, ApiError> {
    let summary = hearsay_ingest::run_hackernews_ingestion(&state.pool, &state.config)
        .await
        .map_err(|e| map_ingest_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: summary,
        meta: ResponseMeta::new(req_id.0),
    }))
}

//! Manual dispatch triggers, one per channel.

use axum::{extract::State, Extension, Json};
use hearsay_notify::{DispatchSummary, NotifyError};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

fn map_notify_error(request_id: String, error: &NotifyError) -> ApiError {
    tracing::error!(error = %error, "dispatch run failed");
    match error {
        NotifyError::Config(message) => {
            ApiError::new(request_id, "config_error", message.clone())
        }
        NotifyError::Db(_) => ApiError::new(request_id, "internal_error", "database unavailable"),
        _ => ApiError::new(request_id, "internal_error", error.to_string()),
    }
}

pub(super) async fn run_email(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<DispatchSummary>>, ApiError> {
    let summary = hearsay_notify::run_email_dispatch(&state.pool, &state.config)
        .await
        .map_err(|e| map_notify_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: summary,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn run_slack(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<DispatchSummary>>, ApiError> {
    let summary = hearsay_notify::run_slack_dispatch(&state.pool, &state.config)
        .await
        .map_err(|e| map_notify_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: summary,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn run_telegram(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<DispatchSummary>>, ApiError> {
    let summary = hearsay_notify::run_telegram_dispatch(&state.pool, &state.config)
        .await
        .map_err(|e| map_notify_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: summary,
        meta: ResponseMeta::new(req_id.0),
    }))
}

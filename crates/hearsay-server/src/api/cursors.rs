//! Pagination cursor inspection and manual override.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct CursorData {
    pub scope: String,
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CursorUpdate {
    pub cursor: Option<String>,
}

pub(super) async fn get_cursor(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(scope): Path<String>,
) -> Result<Json<ApiResponse<CursorData>>, ApiError> {
    let cursor = hearsay_db::get_cursor(&state.pool, &scope)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: CursorData { scope, cursor },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Writes a cursor for a scope key; a null or empty cursor clears it.
pub(super) async fn put_cursor(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(scope): Path<String>,
    Json(update): Json<CursorUpdate>,
) -> Result<Json<ApiResponse<CursorData>>, ApiError> {
    let cursor = update.cursor.filter(|c| !c.trim().is_empty());

    match &cursor {
        Some(value) => hearsay_db::set_cursor(&state.pool, &scope, value)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?,
        None => hearsay_db::clear_cursor(&state.pool, &scope)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?,
    }

    Ok(Json(ApiResponse {
        data: CursorData { scope, cursor },
        meta: ResponseMeta::new(req_id.0),
    }))
}

//! Read endpoint over stored mentions.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hearsay_db::MentionRow;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct MentionQuery {
    pub brand_slug: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct MentionData {
    pub id: Uuid,
    pub platform: String,
    pub item_type: String,
    pub keyword_matched: String,
    pub title: Option<String>,
    pub snippet: String,
    pub author: Option<String>,
    pub url: String,
    pub permalink: Option<String>,
    pub upstream_score: i32,
    pub num_comments: i32,
    pub sentiment_score: f64,
    pub sentiment_label: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<MentionRow> for MentionData {
    fn from(row: MentionRow) -> Self {
        Self {
            id: row.public_id,
            platform: row.platform,
            item_type: row.item_type,
            keyword_matched: row.keyword_matched,
            title: row.title,
            snippet: row.snippet,
            author: row.author,
            url: row.url,
            permalink: row.permalink,
            upstream_score: row.upstream_score,
            num_comments: row.num_comments,
            sentiment_score: row.sentiment_score,
            sentiment_label: row.sentiment_label,
            posted_at: row.posted_at,
            created_at: row.created_at,
        }
    }
}

pub(super) async fn list_mentions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MentionQuery>,
) -> Result<Json<ApiResponse<Vec<MentionData>>>, ApiError> {
    let brand_id = match query.brand_slug.as_deref() {
        Some(slug) => {
            let brand = hearsay_db::get_brand_by_slug(&state.pool, slug)
                .await
                .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
            match brand {
                Some(row) => Some(row.id),
                None => {
                    return Err(ApiError::new(
                        req_id.0.clone(),
                        "not_found",
                        format!("no brand with slug '{slug}'"),
                    ));
                }
            }
        }
        None => None,
    };

    let rows = hearsay_db::list_recent_mentions(&state.pool, brand_id, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(MentionData::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

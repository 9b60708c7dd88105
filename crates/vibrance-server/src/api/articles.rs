use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vibrance_core::DEFAULT_POSITIVITY_THRESHOLD;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ArticlesQuery {
    /// Kept as text so a bad value gets the API's own error envelope.
    pub min_positivity: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct ArticleItem {
    pub(super) id: i64,
    pub(super) title: String,
    pub(super) author: Option<String>,
    pub(super) source: String,
    pub(super) url: String,
    pub(super) summary: String,
    pub(super) content_html: String,
    pub(super) image_url: Option<String>,
    pub(super) sentiment_label: String,
    pub(super) sentiment_score: f64,
    pub(super) top_emotions: Vec<String>,
    pub(super) positivity_score: f64,
    pub(super) tags: Vec<String>,
    pub(super) published_at: DateTime<Utc>,
}

impl From<vibrance_db::ArticleRow> for ArticleItem {
    fn from(row: vibrance_db::ArticleRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            source: row.source,
            url: row.url,
            summary: row.summary,
            content_html: row.content_html,
            image_url: row.image_url,
            sentiment_label: row.sentiment_label,
            sentiment_score: row.sentiment_score,
            top_emotions: row.top_emotions,
            positivity_score: row.positivity_score,
            tags: row.tags,
            published_at: row.published_at,
        }
    }
}

pub(super) async fn list_articles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ArticlesQuery>,
) -> Result<Json<ApiResponse<Vec<ArticleItem>>>, ApiError> {
    let min_positivity = match query.min_positivity.as_deref() {
        None => DEFAULT_POSITIVITY_THRESHOLD,
        Some(raw) => vibrance_core::parse_threshold(raw).map_err(|reason| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                format!("min_positivity: {reason}"),
            )
        })?,
    };

    let rows = vibrance_db::list_published_articles(
        &state.pool,
        min_positivity,
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ArticleItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

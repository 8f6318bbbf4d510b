use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::{ReaderId, RequestId},
    models::SuggestionScore,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RelatedQuery {
    pub limit: Option<usize>,
}

/// Handler for related articles of a published post
pub async fn related(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(reader): Extension<ReaderId>,
    Path(post_id): Path<String>,
    Query(query): Query<RelatedQuery>,
) -> AppResult<Json<Vec<SuggestionScore>>> {
    let limit = state.limits.resolve(query.limit, state.limits.related)?;
    let engine = state.engine_for(&reader);

    let current_post = engine
        .find_post(&post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

    let related = engine.get_related_posts(&current_post, limit).await;

    tracing::info!(
        request_id = %request_id,
        post_id = %post_id,
        count = related.len(),
        "Related posts served"
    );

    Ok(Json(related))
}

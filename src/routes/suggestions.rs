use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::{ReaderId, RequestId},
    models::SuggestionScore,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub current_post_id: Option<String>,
    pub limit: Option<usize>,
}

/// Handler for "for you" suggestions
pub async fn suggest(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(reader): Extension<ReaderId>,
    Query(query): Query<SuggestionQuery>,
) -> AppResult<Json<Vec<SuggestionScore>>> {
    let limit = state
        .limits
        .resolve(query.limit, state.limits.suggestions)?;
    let current_post_id = query
        .current_post_id
        .as_deref()
        .filter(|id| !id.is_empty());

    let suggestions = state
        .engine_for(&reader)
        .generate_suggestions(current_post_id, limit)
        .await;

    tracing::info!(
        request_id = %request_id,
        reader_id = %reader,
        count = suggestions.len(),
        "Suggestions served"
    );

    Ok(Json(suggestions))
}

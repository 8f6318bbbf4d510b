use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::{ReaderId, RequestId},
    models::DEFAULT_CATEGORY,
    routes::AppState,
    services::ReadingSession,
};

#[derive(Debug, Deserialize)]
pub struct TrackReadingRequest {
    pub post_id: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub reading_time_seconds: f64,
    pub total_reading_time_seconds: f64,
}

impl TrackReadingRequest {
    fn into_session(self) -> AppResult<ReadingSession> {
        if self.post_id.trim().is_empty() {
            return Err(AppError::InvalidInput("post_id must not be empty".to_string()));
        }
        if !self.reading_time_seconds.is_finite() || !self.total_reading_time_seconds.is_finite() {
            return Err(AppError::InvalidInput(
                "reading times must be finite numbers".to_string(),
            ));
        }

        Ok(ReadingSession {
            post_id: self.post_id,
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            tags: self.tags,
            reading_time_seconds: self.reading_time_seconds,
            total_expected_reading_time_seconds: self.total_reading_time_seconds,
        })
    }
}

/// Handler for reading-behavior tracking
///
/// Responds as soon as the session is accepted; the write happens in the
/// background.
pub async fn track(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(reader): Extension<ReaderId>,
    Json(request): Json<TrackReadingRequest>,
) -> AppResult<StatusCode> {
    let session = request.into_session()?;

    tracing::info!(
        request_id = %request_id,
        reader_id = %reader,
        post_id = %session.post_id,
        "Tracking reading session"
    );

    // detached; failures are logged by the tracker
    state.tracker_for(&reader).track_reading(session);

    Ok(StatusCode::ACCEPTED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TrackReadingRequest {
        TrackReadingRequest {
            post_id: "p1".to_string(),
            category: None,
            tags: vec!["ai".to_string()],
            reading_time_seconds: 30.0,
            total_reading_time_seconds: 60.0,
        }
    }

    #[test]
    fn test_missing_category_defaults_to_general() {
        let session = request().into_session().unwrap();
        assert_eq!(session.category, "general");
    }

    #[test]
    fn test_blank_post_id_rejected() {
        let mut req = request();
        req.post_id = " ".to_string();
        assert!(matches!(req.into_session(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_non_finite_time_rejected() {
        let mut req = request();
        req.total_reading_time_seconds = f64::INFINITY;
        assert!(matches!(req.into_session(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_request_deserializes_with_optional_fields_missing() {
        let json = r#"{"post_id":"p9","reading_time_seconds":12.5,"total_reading_time_seconds":90}"#;
        let req: TrackReadingRequest = serde_json::from_str(json).unwrap();
        assert!(req.tags.is_empty());
        assert!(req.category.is_none());
    }
}

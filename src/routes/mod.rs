use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    clock::Clock,
    config::Config,
    db::{Cache, ContentStore},
    error::{AppError, AppResult},
    middleware::{make_span_with_request_id, request_context_middleware, ReaderId},
    services::{BehaviorTracker, EngineSettings, SuggestionEngine},
};

pub mod reading;
pub mod related;
pub mod suggestions;

/// Default and maximum result sizes accepted over HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub suggestions: usize,
    pub related: usize,
    pub max: usize,
}

impl Limits {
    /// Applies `default` when `requested` is absent and rejects values
    /// outside `1..=max`
    pub fn resolve(&self, requested: Option<usize>, default: usize) -> AppResult<usize> {
        let limit = requested.unwrap_or(default);
        if limit == 0 || limit > self.max {
            return Err(AppError::InvalidInput(format!(
                "limit must be between 1 and {}",
                self.max
            )));
        }
        Ok(limit)
    }
}

/// Shared application state
///
/// Holds the injected collaborators; engines and trackers are built per
/// request for the calling reader.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub cache: Cache,
    pub clock: Arc<dyn Clock>,
    pub settings: EngineSettings,
    pub limits: Limits,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ContentStore>,
        cache: Cache,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            cache,
            clock,
            settings: config.engine_settings(),
            limits: Limits {
                suggestions: config.suggestion_limit,
                related: config.related_limit,
                max: config.max_limit,
            },
        }
    }

    pub fn engine_for(&self, reader: &ReaderId) -> SuggestionEngine {
        SuggestionEngine::new(
            reader.as_str(),
            self.store.clone(),
            self.cache.clone(),
            self.clock.clone(),
            self.settings.clone(),
        )
    }

    pub fn tracker_for(&self, reader: &ReaderId) -> BehaviorTracker {
        BehaviorTracker::new(reader.as_str(), self.store.clone(), self.clock.clone())
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_context_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/reading", post(reading::track))
        .route("/suggestions", get(suggestions::suggest))
        .route("/posts/:post_id/related", get(related::related))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

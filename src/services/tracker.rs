use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    clock::Clock,
    db::ContentStore,
    error::AppResult,
    models::ReadingObservation,
};

/// A single reading session as reported by the reading UI
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingSession {
    pub post_id: String,
    pub category: String,
    pub tags: Vec<String>,
    pub reading_time_seconds: f64,
    pub total_expected_reading_time_seconds: f64,
}

/// Records reading behavior for one reader
#[derive(Clone)]
pub struct BehaviorTracker {
    user_id: String,
    store: Arc<dyn ContentStore>,
    clock: Arc<dyn Clock>,
}

impl BehaviorTracker {
    pub fn new(user_id: impl Into<String>, store: Arc<dyn ContentStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_id: user_id.into(),
            store,
            clock,
        }
    }

    /// Tracks a session without waiting for the write.
    ///
    /// The append runs as a detached task; any failure is logged there and
    /// never reaches the caller. The handle may be dropped.
    pub fn track_reading(&self, session: ReadingSession) -> JoinHandle<()> {
        let tracker = self.clone();

        tokio::spawn(async move {
            let post_id = session.post_id.clone();
            if let Err(e) = tracker.record_reading(session).await {
                tracing::error!(
                    error = %e,
                    user_id = %tracker.user_id,
                    post_id = %post_id,
                    "Failed to track reading behavior"
                );
            }
        })
    }

    /// Builds the observation for `session` and appends it to the store
    pub async fn record_reading(&self, session: ReadingSession) -> AppResult<ReadingObservation> {
        let observation = ReadingObservation::new(
            self.user_id.clone(),
            session.post_id,
            session.category,
            session.tags,
            session.reading_time_seconds,
            session.total_expected_reading_time_seconds,
            self.clock.now(),
        );

        self.store.append_observation(&observation).await?;

        tracing::debug!(
            user_id = %observation.user_id,
            post_id = %observation.post_id,
            tier = %observation.engagement_tier,
            time_spent_percent = observation.time_spent_percent,
            "Reading tracked"
        );

        Ok(observation)
    }
}

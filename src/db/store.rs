use crate::{
    error::AppResult,
    models::{Post, ReadingObservation},
};

/// The external content store as seen by the suggestion engine
///
/// Two reads and one append; the engine never updates or deletes.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Most recent `limit` observations for `user_id`, newest first
    async fn recent_observations(
        &self,
        user_id: &str,
        limit: usize,
    ) -> AppResult<Vec<ReadingObservation>>;

    /// All published blog posts, most recently modified first
    async fn published_posts(&self) -> AppResult<Vec<Post>>;

    /// Appends one observation as a new record
    async fn append_observation(&self, observation: &ReadingObservation) -> AppResult<()>;
}

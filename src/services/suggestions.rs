use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{build_preferences, related_posts, scoring};
use crate::{
    cached,
    clock::Clock,
    db::{Cache, CacheKey, ContentStore},
    error::AppResult,
    models::{Post, ReadingObservation, SuggestionScore},
};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 6;
pub const DEFAULT_RELATED_LIMIT: usize = 4;

const COLD_START_REASON: &str = "Popular content";

/// Tuning shared by every engine instance
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// How many recent observations feed the preference profile
    pub history_limit: usize,
    pub cache_ttl: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            history_limit: 50,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// Post suggestions for a single reader
///
/// Construct one per reader. Instances built over the same [`Cache`] share
/// the corpus entry; every history-derived key carries the reader's id.
pub struct SuggestionEngine {
    user_id: String,
    store: Arc<dyn ContentStore>,
    cache: Cache,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
}

impl SuggestionEngine {
    pub fn new(
        user_id: impl Into<String>,
        store: Arc<dyn ContentStore>,
        cache: Cache,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            store,
            cache,
            clock,
            settings,
        }
    }

    /// Ranked "for you" suggestions, excluding `current_post_id`.
    ///
    /// Never fails: any store or scoring error is logged and yields an empty
    /// list.
    pub async fn generate_suggestions(
        &self,
        current_post_id: Option<&str>,
        limit: usize,
    ) -> Vec<SuggestionScore> {
        match self.try_generate_suggestions(current_post_id, limit).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    user_id = %self.user_id,
                    current_post_id = ?current_post_id,
                    "Failed to generate suggestions"
                );
                Vec::new()
            }
        }
    }

    /// Posts similar in content to `current_post`, regardless of reading history.
    ///
    /// Never fails: errors are logged and yield an empty list.
    pub async fn get_related_posts(&self, current_post: &Post, limit: usize) -> Vec<SuggestionScore> {
        match self.try_get_related_posts(current_post, limit).await {
            Ok(related) => related,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    user_id = %self.user_id,
                    post_id = %current_post.id,
                    "Failed to get related posts"
                );
                Vec::new()
            }
        }
    }

    /// Looks a published post up by id in the (cached) corpus
    pub async fn find_post(&self, post_id: &str) -> AppResult<Option<Post>> {
        let posts = self.published_posts().await?;
        Ok(posts.into_iter().find(|p| p.id == post_id))
    }

    async fn try_generate_suggestions(
        &self,
        current_post_id: Option<&str>,
        limit: usize,
    ) -> AppResult<Vec<SuggestionScore>> {
        let key = CacheKey::Suggestions {
            user_id: self.user_id.clone(),
            current_post_id: current_post_id.map(str::to_string),
            limit,
        };

        cached!(self.cache, key, self.settings.cache_ttl, async {
            let (observations, posts) = tokio::try_join!(
                self.store
                    .recent_observations(&self.user_id, self.settings.history_limit),
                self.published_posts()
            )?;

            let suggestions = if observations.is_empty() {
                tracing::debug!(user_id = %self.user_id, "No reading history, ranking by popularity");
                popularity_ranking(&posts, current_post_id, limit)
            } else {
                personalized_ranking(&posts, &observations, current_post_id, limit, self.clock.now())
            };

            tracing::info!(
                user_id = %self.user_id,
                history = observations.len(),
                candidates = posts.len(),
                returned = suggestions.len(),
                "Suggestions generated"
            );

            AppResult::Ok(suggestions)
        })
    }

    async fn try_get_related_posts(
        &self,
        current_post: &Post,
        limit: usize,
    ) -> AppResult<Vec<SuggestionScore>> {
        let key = CacheKey::RelatedPosts {
            user_id: self.user_id.clone(),
            post_id: current_post.id.clone(),
            limit,
        };

        cached!(self.cache, key, self.settings.cache_ttl, async {
            let posts = self.published_posts().await?;
            AppResult::Ok(related_posts(current_post, &posts, limit))
        })
    }

    /// The published corpus, cached once for all readers
    async fn published_posts(&self) -> AppResult<Vec<Post>> {
        let key = CacheKey::Posts;

        cached!(self.cache, key, self.settings.cache_ttl, async {
            let posts = self.store.published_posts().await?;
            tracing::debug!(count = posts.len(), "Fetched published posts");
            AppResult::Ok(posts)
        })
    }
}

/// Cold-start ranking by raw engagement (`views + likes×2 + shares×3`)
pub fn popularity_ranking(
    posts: &[Post],
    exclude_post_id: Option<&str>,
    limit: usize,
) -> Vec<SuggestionScore> {
    let mut ranked: Vec<SuggestionScore> = posts
        .iter()
        .filter(|p| Some(p.id.as_str()) != exclude_post_id)
        .map(|p| SuggestionScore {
            post: p.clone(),
            score: p.engagement() as f64,
            reasons: vec![COLD_START_REASON.to_string()],
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

/// Ranks every post except `exclude_post_id` against the reader's history
pub fn personalized_ranking(
    posts: &[Post],
    observations: &[ReadingObservation],
    exclude_post_id: Option<&str>,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<SuggestionScore> {
    let preferences = build_preferences(observations);
    let authors = scoring::read_authors(observations, posts);

    let mut ranked: Vec<SuggestionScore> = posts
        .iter()
        .filter(|p| Some(p.id.as_str()) != exclude_post_id)
        .map(|p| scoring::score_with_authors(p, &preferences, &authors, now))
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

use std::cmp::Reverse;

use tokio::sync::RwLock;

use super::ContentStore;
use crate::{
    error::AppResult,
    models::{Post, ReadingObservation},
};

/// In-process content store for local development and tests
#[derive(Default)]
pub struct MemoryContentStore {
    posts: RwLock<Vec<Post>>,
    observations: RwLock<Vec<ReadingObservation>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
            observations: RwLock::new(Vec::new()),
        }
    }

    /// Inserts or replaces a post by id
    pub async fn upsert_post(&self, post: Post) {
        let mut posts = self.posts.write().await;
        match posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => *existing = post,
            None => posts.push(post),
        }
    }

    pub async fn observation_count(&self) -> usize {
        self.observations.read().await.len()
    }
}

#[async_trait::async_trait]
impl ContentStore for MemoryContentStore {
    async fn recent_observations(
        &self,
        user_id: &str,
        limit: usize,
    ) -> AppResult<Vec<ReadingObservation>> {
        let observations = self.observations.read().await;
        let mut mine: Vec<ReadingObservation> = observations
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by_key(|o| Reverse(o.timestamp));
        mine.truncate(limit);
        Ok(mine)
    }

    async fn published_posts(&self) -> AppResult<Vec<Post>> {
        let mut posts = self.posts.read().await.clone();
        posts.sort_by_key(|p| Reverse(p.last_modified));
        Ok(posts)
    }

    async fn append_observation(&self, observation: &ReadingObservation) -> AppResult<()> {
        self.observations.write().await.push(observation.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn post(id: &str, age_days: i64) -> Post {
        Post {
            id: id.to_string(),
            title: id.to_string(),
            category: "general".to_string(),
            tags: vec![],
            author: String::new(),
            last_modified: Utc::now() - Duration::days(age_days),
            views: 0,
            likes: 0,
            shares: 0,
        }
    }

    #[tokio::test]
    async fn test_posts_are_newest_first() {
        let store = MemoryContentStore::with_posts(vec![post("old", 10), post("new", 1)]);
        let posts = store.published_posts().await.unwrap();
        assert_eq!(posts[0].id, "new");
        assert_eq!(posts[1].id, "old");
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_post() {
        let store = MemoryContentStore::with_posts(vec![post("a", 1)]);
        let mut updated = post("a", 1);
        updated.views = 99;
        store.upsert_post(updated).await;

        let posts = store.published_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].views, 99);
    }

    #[tokio::test]
    async fn test_recent_observations_filters_sorts_and_limits() {
        let store = MemoryContentStore::new();
        let now = Utc::now();
        for (i, user) in ["u1", "u2", "u1", "u1"].iter().enumerate() {
            let obs = ReadingObservation::new(
                *user,
                format!("p{}", i),
                "tech",
                vec![],
                10.0,
                20.0,
                now + Duration::seconds(i as i64),
            );
            store.append_observation(&obs).await.unwrap();
        }

        let recent = store.recent_observations("u1", 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].post_id, "p3");
        assert_eq!(recent[1].post_id, "p2");
        assert_eq!(store.observation_count().await, 4);
    }
}

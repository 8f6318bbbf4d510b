use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category assigned to posts that were stored without one
pub const DEFAULT_CATEGORY: &str = "general";

/// A published blog post, normalized for scoring
///
/// Every optional field of the stored record has already been defaulted, so
/// scoring code never has to branch on absence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: String,
    pub last_modified: DateTime<Utc>,
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
}

impl Post {
    /// Raw engagement total: `views + likes×2 + shares×3`
    pub fn engagement(&self) -> u64 {
        self.views
            .saturating_add(self.likes.saturating_mul(2))
            .saturating_add(self.shares.saturating_mul(3))
    }
}

/// A post as it comes out of the content store, with every field that may be
/// missing in older documents left optional
#[derive(Debug, Clone, Default, Deserialize, sqlx::FromRow)]
pub struct PostRecord {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub author: Option<String>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub views: Option<i64>,
    #[serde(default)]
    pub likes: Option<i64>,
    #[serde(default)]
    pub shares: Option<i64>,
}

fn counter(value: Option<i64>) -> u64 {
    value.map(|v| v.max(0) as u64).unwrap_or(0)
}

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        let category = record
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Post {
            id: record.id,
            title: record.title.unwrap_or_default(),
            category,
            tags: record.tags.unwrap_or_default(),
            author: record.author.unwrap_or_default(),
            last_modified: record.last_modified,
            views: counter(record.views),
            likes: counter(record.likes),
            shares: counter(record.shares),
        }
    }
}

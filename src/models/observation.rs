use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

/// User id recorded for readers who are not signed in
pub const ANONYMOUS_USER: &str = "anonymous";

/// Coarse summary of how attentively a post was read
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EngagementTier {
    Low,
    Medium,
    High,
}

impl EngagementTier {
    /// Buckets a reading session; thresholds are checked from `High` down
    pub fn classify(time_spent_percent: f64, reading_time_seconds: f64) -> Self {
        if time_spent_percent >= 80.0 && reading_time_seconds >= 30.0 {
            EngagementTier::High
        } else if time_spent_percent >= 50.0 && reading_time_seconds >= 15.0 {
            EngagementTier::Medium
        } else {
            EngagementTier::Low
        }
    }

    /// Preference weight multiplier for this tier
    pub fn multiplier(self) -> f64 {
        match self {
            EngagementTier::Low => 1.0,
            EngagementTier::Medium => 2.0,
            EngagementTier::High => 3.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EngagementTier::Low => "low",
            EngagementTier::Medium => "medium",
            EngagementTier::High => "high",
        }
    }
}

impl Display for EngagementTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EngagementTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(EngagementTier::Low),
            "medium" => Ok(EngagementTier::Medium),
            "high" => Ok(EngagementTier::High),
            other => Err(format!("unknown engagement tier: {}", other)),
        }
    }
}

/// One reading session, appended once and never updated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadingObservation {
    pub id: Uuid,
    pub user_id: String,
    pub post_id: String,
    pub category: String,
    pub tags: Vec<String>,
    pub reading_time_seconds: f64,
    pub time_spent_percent: f64,
    pub engagement_tier: EngagementTier,
    pub timestamp: DateTime<Utc>,
}

impl ReadingObservation {
    /// Builds an observation from raw session timings.
    ///
    /// Reading time is clamped to be non-negative and the percentage to
    /// `0..=100`; a non-positive expected reading time yields 0%.
    pub fn new(
        user_id: impl Into<String>,
        post_id: impl Into<String>,
        category: impl Into<String>,
        tags: Vec<String>,
        reading_time_seconds: f64,
        total_expected_reading_time_seconds: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let reading_time_seconds = if reading_time_seconds.is_finite() {
            reading_time_seconds.max(0.0)
        } else {
            0.0
        };
        let time_spent_percent =
            time_spent_percent(reading_time_seconds, total_expected_reading_time_seconds);

        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            post_id: post_id.into(),
            category: category.into(),
            tags,
            reading_time_seconds,
            time_spent_percent,
            engagement_tier: EngagementTier::classify(time_spent_percent, reading_time_seconds),
            timestamp,
        }
    }
}

fn time_spent_percent(reading_time_seconds: f64, total_expected_reading_time_seconds: f64) -> f64 {
    if total_expected_reading_time_seconds.is_nan() || total_expected_reading_time_seconds <= 0.0 {
        return 0.0;
    }
    (reading_time_seconds / total_expected_reading_time_seconds * 100.0).clamp(0.0, 100.0)
}

/// Row shape of the `user_interests` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ObservationRecord {
    pub id: Uuid,
    pub user_id: String,
    pub post_id: String,
    pub category: String,
    pub tags: Vec<String>,
    pub reading_time: f64,
    pub time_spent_percent: f64,
    pub engagement_level: String,
    pub created_at: DateTime<Utc>,
}

impl From<ObservationRecord> for ReadingObservation {
    fn from(record: ObservationRecord) -> Self {
        let engagement_tier = record.engagement_level.parse().unwrap_or_else(|_| {
            EngagementTier::classify(record.time_spent_percent, record.reading_time)
        });

        Self {
            id: record.id,
            user_id: record.user_id,
            post_id: record.post_id,
            category: record.category,
            tags: record.tags,
            reading_time_seconds: record.reading_time,
            time_spent_percent: record.time_spent_percent,
            engagement_tier,
            timestamp: record.created_at,
        }
    }
}

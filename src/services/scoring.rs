use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use crate::models::{Post, PreferenceProfile, ReadingObservation, SuggestionScore};

const CATEGORY_FACTOR: f64 = 0.4;
const TAG_FACTOR: f64 = 0.3;
const RECENT_BONUS: f64 = 2.0;
const THIS_MONTH_BONUS: f64 = 1.0;
const POPULARITY_SCALE: f64 = 100.0;
const POPULARITY_CAP: f64 = 2.0;
const AUTHOR_BONUS: f64 = 1.0;
const MAX_REASONS: usize = 3;

/// Authors of every post the reader has an observation for
pub fn read_authors(observations: &[ReadingObservation], posts: &[Post]) -> HashSet<String> {
    let by_id: HashMap<&str, &Post> = posts.iter().map(|p| (p.id.as_str(), p)).collect();

    observations
        .iter()
        .filter_map(|o| by_id.get(o.post_id.as_str()))
        .filter(|p| !p.author.is_empty())
        .map(|p| p.author.clone())
        .collect()
}

/// Scores one candidate against a reader's preference profile.
///
/// Components are added in a fixed order (category, tags, recency,
/// popularity, author) and reasons are kept in that same order, so when more
/// than three apply the affinity reasons win.
pub fn score_post(
    post: &Post,
    preferences: &PreferenceProfile,
    observations: &[ReadingObservation],
    posts: &[Post],
    now: DateTime<Utc>,
) -> SuggestionScore {
    let authors = read_authors(observations, posts);
    score_with_authors(post, preferences, &authors, now)
}

/// Same as [`score_post`] with the reader's authors already resolved, for
/// scoring a whole corpus without rebuilding the author set per post.
pub fn score_with_authors(
    post: &Post,
    preferences: &PreferenceProfile,
    read_authors: &HashSet<String>,
    now: DateTime<Utc>,
) -> SuggestionScore {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if let Some(weight) = preferences
        .category_weight
        .get(&post.category)
        .filter(|w| **w > 0.0)
    {
        score += weight * CATEGORY_FACTOR;
        reasons.push(format!("Similar to your {} interests", post.category));
    }

    let mut seen = HashSet::new();
    let matched: Vec<(&str, f64)> = post
        .tags
        .iter()
        .filter(|t| seen.insert(t.as_str()))
        .filter_map(|t| {
            preferences
                .tag_weight
                .get(t)
                .filter(|w| **w > 0.0)
                .map(|w| (t.as_str(), *w))
        })
        .collect();
    if !matched.is_empty() {
        let mean = matched.iter().map(|(_, w)| w).sum::<f64>() / matched.len() as f64;
        score += mean * TAG_FACTOR;
        let names: Vec<&str> = matched.iter().map(|(t, _)| *t).collect();
        reasons.push(format!("Matches your interest in: {}", names.join(", ")));
    }

    let age = now - post.last_modified;
    if age <= Duration::days(7) {
        score += RECENT_BONUS;
        reasons.push("Recently published".to_string());
    } else if age <= Duration::days(30) {
        score += THIS_MONTH_BONUS;
        reasons.push("Published this month".to_string());
    }

    let popularity = post.engagement() as f64 / POPULARITY_SCALE;
    if popularity > 0.0 {
        score += popularity.min(POPULARITY_CAP);
        reasons.push("Popular among readers".to_string());
    }

    if !post.author.is_empty() && read_authors.contains(&post.author) {
        score += AUTHOR_BONUS;
        reasons.push(format!("From {}", post.author));
    }

    reasons.truncate(MAX_REASONS);

    SuggestionScore {
        post: post.clone(),
        score: score.max(0.0),
        reasons,
    }
}

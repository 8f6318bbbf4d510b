use std::collections::HashSet;

use crate::models::{Post, SuggestionScore};

const SAME_CATEGORY_SCORE: f64 = 5.0;
const SHARED_TAG_SCORE: f64 = 2.0;
const SAME_AUTHOR_SCORE: f64 = 1.0;
const MAX_REASONS: usize = 2;

/// Ranks posts by content overlap with `current`, ignoring reading history.
///
/// Candidates with nothing in common are dropped rather than used to fill
/// `limit`, so the result may be shorter than requested.
pub fn related_posts(current: &Post, corpus: &[Post], limit: usize) -> Vec<SuggestionScore> {
    let current_tags: HashSet<&str> = current.tags.iter().map(String::as_str).collect();

    let mut related: Vec<SuggestionScore> = corpus
        .iter()
        .filter(|candidate| candidate.id != current.id)
        .filter_map(|candidate| similarity(current, &current_tags, candidate))
        .collect();

    // stable: ties keep corpus order (most recently modified first)
    related.sort_by(|a, b| b.score.total_cmp(&a.score));
    related.truncate(limit);
    related
}

fn similarity(
    current: &Post,
    current_tags: &HashSet<&str>,
    candidate: &Post,
) -> Option<SuggestionScore> {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if candidate.category == current.category {
        score += SAME_CATEGORY_SCORE;
        reasons.push(format!("Same category: {}", candidate.category));
    }

    let mut seen = HashSet::new();
    let shared: Vec<&str> = candidate
        .tags
        .iter()
        .map(String::as_str)
        .filter(|t| current_tags.contains(t) && seen.insert(*t))
        .collect();
    if !shared.is_empty() {
        score += SHARED_TAG_SCORE * shared.len() as f64;
        reasons.push(format!("Shared tags: {}", shared.join(", ")));
    }

    if !candidate.author.is_empty() && candidate.author == current.author {
        score += SAME_AUTHOR_SCORE;
        reasons.push(format!("Same author: {}", candidate.author));
    }

    if score <= 0.0 {
        return None;
    }

    reasons.truncate(MAX_REASONS);
    Some(SuggestionScore {
        post: candidate.clone(),
        score,
        reasons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(id: &str, category: &str, tags: &[&str], author: &str) -> Post {
        Post {
            id: id.to_string(),
            title: id.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: author.to_string(),
            last_modified: Utc::now(),
            views: 0,
            likes: 0,
            shares: 0,
        }
    }

    #[test]
    fn test_scores_category_tags_and_author() {
        let current = post("cur", "tech", &["ai", "cloud"], "Ana");
        let corpus = vec![
            current.clone(),
            post("a", "tech", &["ai", "cloud"], "Ana"),
            post("b", "design", &["ai"], "Ben"),
            post("c", "design", &[], "Ana"),
        ];

        let related = related_posts(&current, &corpus, 4);
        let ids: Vec<&str> = related.iter().map(|s| s.post.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(related[0].score, 10.0);
        assert_eq!(related[1].score, 2.0);
        assert_eq!(related[2].score, 1.0);
    }

    #[test]
    fn test_reasons_truncated_to_two() {
        let current = post("cur", "tech", &["ai"], "Ana");
        let corpus = vec![post("a", "tech", &["ai"], "Ana")];

        let related = related_posts(&current, &corpus, 4);
        assert_eq!(
            related[0].reasons,
            vec!["Same category: tech", "Shared tags: ai"]
        );
    }

    #[test]
    fn test_excludes_current_post() {
        let current = post("cur", "tech", &["ai"], "Ana");
        let corpus = vec![current.clone(), post("a", "tech", &[], "")];

        let related = related_posts(&current, &corpus, 4);
        assert!(related.iter().all(|s| s.post.id != "cur"));
        assert_eq!(related.len(), 1);
    }

    #[test]
    fn test_unrelated_posts_are_not_padded_in() {
        let current = post("cur", "tech", &["ai"], "Ana");
        let mut corpus = vec![
            post("match-1", "tech", &[], "Zed"),
            post("match-2", "news", &["ai"], "Zed"),
        ];
        for i in 0..8 {
            corpus.push(post(&format!("other-{}", i), "cooking", &["food"], "Zed"));
        }

        let related = related_posts(&current, &corpus, 4);
        assert_eq!(related.len(), 2);
        assert!(related.iter().all(|s| s.score > 0.0));
    }

    #[test]
    fn test_blank_authors_do_not_match() {
        let current = post("cur", "tech", &[], "");
        let corpus = vec![post("a", "news", &[], "")];
        assert!(related_posts(&current, &corpus, 4).is_empty());
    }

    #[test]
    fn test_limit_applies_after_sorting() {
        let current = post("cur", "tech", &["ai", "ml"], "Ana");
        let corpus = vec![
            post("low", "news", &["ai"], "Zed"),
            post("high", "tech", &["ai", "ml"], "Ana"),
            post("mid", "tech", &[], "Zed"),
        ];

        let related = related_posts(&current, &corpus, 2);
        let ids: Vec<&str> = related.iter().map(|s| s.post.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid"]);
    }
}

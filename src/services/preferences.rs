use crate::models::{PreferenceProfile, ReadingObservation};

/// Folds reading history into category and tag affinity weights.
///
/// Each observation contributes `tier multiplier × time_spent_percent / 100`
/// to its category and, undivided, to every one of its tags. Weights only
/// accumulate; older observations count the same as recent ones.
pub fn build_preferences(observations: &[ReadingObservation]) -> PreferenceProfile {
    let mut profile = PreferenceProfile::default();

    for observation in observations {
        let weight = observation_weight(observation);

        *profile
            .category_weight
            .entry(observation.category.clone())
            .or_insert(0.0) += weight;

        for tag in &observation.tags {
            *profile.tag_weight.entry(tag.clone()).or_insert(0.0) += weight;
        }
    }

    profile
}

fn observation_weight(observation: &ReadingObservation) -> f64 {
    let fraction = (observation.time_spent_percent / 100.0).max(0.0);
    observation.engagement_tier.multiplier() * fraction
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod observation;
pub mod post;

pub use observation::{EngagementTier, ObservationRecord, ReadingObservation, ANONYMOUS_USER};
pub use post::{Post, PostRecord, DEFAULT_CATEGORY};

/// Accumulated category and tag affinity derived from reading history
///
/// Never persisted; rebuilt from observations on every scoring pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceProfile {
    pub category_weight: HashMap<String, f64>,
    pub tag_weight: HashMap<String, f64>,
}

/// A ranked post together with the reasons it was chosen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionScore {
    pub post: Post,
    pub score: f64,
    /// Most significant first
    pub reasons: Vec<String>,
}

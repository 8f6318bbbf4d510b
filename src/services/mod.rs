pub mod preferences;
pub mod related;
pub mod scoring;
pub mod suggestions;
pub mod tracker;

pub use preferences::build_preferences;
pub use related::related_posts;
pub use scoring::score_post;
pub use suggestions::{
    personalized_ranking, popularity_ranking, EngineSettings, SuggestionEngine,
    DEFAULT_RELATED_LIMIT, DEFAULT_SUGGESTION_LIMIT,
};
pub use tracker::{BehaviorTracker, ReadingSession};

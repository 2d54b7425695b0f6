// Core algorithm exports
pub mod engine;
pub mod recommend;
pub mod scoring;
pub mod similarity;

pub use engine::Engine;
pub use recommend::{cold_start_recommendations, generate_recommendations, MAX_RECOMMENDATIONS};
pub use scoring::{calculate_match_score, category_fit, estimate_wait_minutes, fuzzy_tag_match};
pub use similarity::{pair_similarity, SimilarityModel};

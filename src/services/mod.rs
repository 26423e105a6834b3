pub mod collaborative;
pub mod content_based;
pub mod evaluation;
pub mod hybrid;
pub mod providers;
pub mod recommendations;
pub mod similarity;

pub use recommendations::RecommendationService;

use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod movie;
pub mod rating;

pub use movie::Movie;
pub use rating::{rated_movie_ids, valid_ratings, Rating, RatingMatrix, MAX_RATING};

pub type UserId = u32;
pub type MovieId = u32;

/// Which strategy produced a recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Collaborative,
    ContentBased,
    Hybrid,
    Popular,
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Algorithm::Collaborative => "collaborative",
            Algorithm::ContentBased => "content-based",
            Algorithm::Hybrid => "hybrid",
            Algorithm::Popular => "popular",
        };
        write!(f, "{}", name)
    }
}

/// A ranked suggestion returned to the client
///
/// `score` is meant to fall in [0, 1] but is not clamped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub score: f64,
    /// Human-readable explanation
    pub reason: String,
    pub algorithm: Algorithm,
}

impl Recommendation {
    pub fn new(
        movie_id: MovieId,
        title: impl Into<String>,
        score: f64,
        reason: impl Into<String>,
        algorithm: Algorithm,
    ) -> Self {
        Self {
            movie_id,
            title: title.into(),
            score,
            reason: reason.into(),
            algorithm,
        }
    }
}

/// Aggregate offline metrics for one evaluation run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub mae: f64,
    pub rmse: f64,
    pub precision_at_k: f64,
    pub recall_at_k: f64,
    pub f1_at_k: f64,
    pub map: f64,
    pub coverage: f64,
    pub diversity: f64,
    pub k: usize,
    pub total_recommendations: usize,
    pub relevant_items: usize,
}

impl Display for EvaluationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MAE={:.3}, RMSE={:.3}, Precision@{k}={:.3}, Recall@{k}={:.3}, F1@{k}={:.3}, \
             MAP={:.3}, Coverage={:.3}, Diversity={:.3}, Recommendations={}, Relevant={}",
            self.mae,
            self.rmse,
            self.precision_at_k,
            self.recall_at_k,
            self.f1_at_k,
            self.map,
            self.coverage,
            self.diversity,
            self.total_recommendations,
            self.relevant_items,
            k = self.k,
        )
    }
}

//! Offline quality metrics for predictions and ranked recommendation lists.
//!
//! Every function is pure and total: degenerate inputs produce a defined
//! value instead of an error so that batch runs never abort midway.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use crate::models::{EvaluationResult, MovieId, Recommendation};
use crate::services::similarity::jaccard;

/// Returned by [`mae`] and [`rmse`] when predictions and ground truth don't overlap
pub const UNDEFINED_ERROR: f64 = f64::MAX;

/// Cutoff used when the caller doesn't pick one
pub const DEFAULT_K: usize = 10;

/// Prediction errors on the movies present in both maps
fn errors(predicted: &HashMap<MovieId, f64>, actual: &HashMap<MovieId, u8>) -> Vec<f64> {
    actual
        .iter()
        .filter_map(|(movie_id, rating)| {
            predicted
                .get(movie_id)
                .map(|prediction| prediction - f64::from(*rating))
        })
        .collect()
}

/// Mean absolute error
pub fn mae(predicted: &HashMap<MovieId, f64>, actual: &HashMap<MovieId, u8>) -> f64 {
    let errors = errors(predicted, actual);
    if errors.is_empty() {
        return UNDEFINED_ERROR;
    }

    errors.iter().map(|e| e.abs()).sum::<f64>() / errors.len() as f64
}

/// Root mean squared error
pub fn rmse(predicted: &HashMap<MovieId, f64>, actual: &HashMap<MovieId, u8>) -> f64 {
    let errors = errors(predicted, actual);
    if errors.is_empty() {
        return UNDEFINED_ERROR;
    }

    (errors.iter().map(|e| e * e).sum::<f64>() / errors.len() as f64).sqrt()
}

/// Share of the first `k` recommendations that are relevant
///
/// Divides by `min(k, recommendations taken)`.
pub fn precision_at_k(recs: &[Recommendation], relevant: &HashSet<MovieId>, k: usize) -> f64 {
    if recs.is_empty() || relevant.is_empty() {
        return 0.0;
    }

    let top_k = &recs[..k.min(recs.len())];
    if top_k.is_empty() {
        return 0.0;
    }

    let hits = top_k
        .iter()
        .filter(|rec| relevant.contains(&rec.movie_id))
        .count();

    hits as f64 / top_k.len() as f64
}

/// Share of the relevant set found in the first `k` recommendations
pub fn recall_at_k(recs: &[Recommendation], relevant: &HashSet<MovieId>, k: usize) -> f64 {
    if recs.is_empty() || relevant.is_empty() {
        return 0.0;
    }

    let found: HashSet<MovieId> = recs
        .iter()
        .take(k)
        .map(|rec| rec.movie_id)
        .filter(|movie_id| relevant.contains(movie_id))
        .collect();

    found.len() as f64 / relevant.len() as f64
}

/// Harmonic mean of [`precision_at_k`] and [`recall_at_k`]
pub fn f1_at_k(recs: &[Recommendation], relevant: &HashSet<MovieId>, k: usize) -> f64 {
    let precision = precision_at_k(recs, relevant, k);
    let recall = recall_at_k(recs, relevant, k);

    if precision + recall == 0.0 {
        return 0.0;
    }

    2.0 * precision * recall / (precision + recall)
}

/// Average precision over the whole ranked list
///
/// The accumulated precision is divided by the size of the relevant set, not
/// by the number of relevant items actually found.
pub fn mean_average_precision(recs: &[Recommendation], relevant: &HashSet<MovieId>) -> f64 {
    if recs.is_empty() || relevant.is_empty() {
        return 0.0;
    }

    let mut hits = 0;
    let mut precision_sum = 0.0;

    for (position, rec) in recs.iter().enumerate() {
        if relevant.contains(&rec.movie_id) {
            hits += 1;
            precision_sum += hits as f64 / (position + 1) as f64;
        }
    }

    precision_sum / relevant.len() as f64
}

/// Recommended ids that exist in the catalog, as a fraction of the catalog
pub fn coverage(recommended: &HashSet<MovieId>, catalog: &HashSet<MovieId>) -> f64 {
    if catalog.is_empty() {
        return 0.0;
    }

    recommended.intersection(catalog).count() as f64 / catalog.len() as f64
}

/// Mean pairwise genre dissimilarity (`1 - jaccard`) over all unordered pairs
///
/// Movies absent from `genres` have no genres; a pair with no genres between
/// them counts as fully dissimilar.
pub fn diversity(recs: &[Recommendation], genres: &HashMap<MovieId, HashSet<String>>) -> f64 {
    if recs.len() < 2 {
        return 0.0;
    }

    let empty = HashSet::new();
    let genres_of = |movie_id: MovieId| genres.get(&movie_id).unwrap_or(&empty);

    let mut total = 0.0;
    let mut pairs = 0;

    for (i, first) in recs.iter().enumerate() {
        for second in &recs[i + 1..] {
            let a = genres_of(first.movie_id);
            let b = genres_of(second.movie_id);

            total += if a.is_empty() && b.is_empty() {
                1.0
            } else {
                1.0 - jaccard(a, b)
            };
            pairs += 1;
        }
    }

    total / pairs as f64
}

/// Ground truth and outputs for one evaluation run
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationInput {
    /// Predicted ratings by movie
    #[serde(default)]
    pub predicted: HashMap<MovieId, f64>,
    /// Held-out actual ratings by movie
    #[serde(default)]
    pub actual: HashMap<MovieId, u8>,
    /// Ranked list under evaluation
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    /// Movies known to be relevant to the user
    #[serde(default)]
    pub relevant: HashSet<MovieId>,
    #[serde(default)]
    pub catalog_ids: HashSet<MovieId>,
    #[serde(default)]
    pub genres: HashMap<MovieId, HashSet<String>>,
}

/// Computes every metric for one run at cutoff `k`
pub fn evaluate(input: &EvaluationInput, k: usize) -> EvaluationResult {
    let recs = &input.recommendations;
    let relevant = &input.relevant;
    let recommended: HashSet<MovieId> = recs.iter().map(|rec| rec.movie_id).collect();

    let result = EvaluationResult {
        mae: mae(&input.predicted, &input.actual),
        rmse: rmse(&input.predicted, &input.actual),
        precision_at_k: precision_at_k(recs, relevant, k),
        recall_at_k: recall_at_k(recs, relevant, k),
        f1_at_k: f1_at_k(recs, relevant, k),
        map: mean_average_precision(recs, relevant),
        coverage: coverage(&recommended, &input.catalog_ids),
        diversity: diversity(recs, &input.genres),
        k,
        total_recommendations: recs.len(),
        relevant_items: relevant.len(),
    };

    tracing::info!(%result, "Evaluation completed");

    result
}

use std::collections::{HashMap, HashSet};

use crate::models::{Algorithm, Movie, MovieId, Recommendation};

/// Score given to every popularity fallback entry
pub const POPULAR_SCORE: f64 = 0.7;

pub const POPULAR_REASON: &str = "popular movie you might like";

pub const HYBRID_REASON: &str = "Combined collaborative and content-based filtering";

/// Merges the two branch outputs into one ranked list of at most `limit`
///
/// A movie suggested by both branches keeps its first entry with the two
/// scores averaged and is marked [`Algorithm::Hybrid`]. Collaborative results
/// are inserted first; equal scores keep insertion order.
pub fn merge(
    collaborative: Vec<Recommendation>,
    content_based: Vec<Recommendation>,
    limit: usize,
) -> Vec<Recommendation> {
    let mut merged: Vec<Recommendation> = Vec::new();
    let mut positions: HashMap<MovieId, usize> = HashMap::new();

    for rec in collaborative.into_iter().chain(content_based) {
        match positions.get(&rec.movie_id) {
            Some(&index) => {
                let existing = &mut merged[index];
                existing.score = (existing.score + rec.score) / 2.0;
                existing.algorithm = Algorithm::Hybrid;
                existing.reason = HYBRID_REASON.to_string();
            }
            None => {
                positions.insert(rec.movie_id, merged.len());
                merged.push(rec);
            }
        }
    }

    merged.sort_by(|a, b| b.score.total_cmp(&a.score));
    merged.truncate(limit);
    merged
}

/// Top-rated catalog movies the user hasn't rated
///
/// Ordered by aggregate rating, then rating count, both descending; missing
/// values count as 0.
pub fn popular_fallback(
    catalog: &[Movie],
    rated: &HashSet<MovieId>,
    limit: usize,
) -> Vec<Recommendation> {
    let mut candidates: Vec<&Movie> = catalog
        .iter()
        .filter(|movie| !rated.contains(&movie.movie_id))
        .collect();

    candidates.sort_by(|a, b| {
        b.average_rating()
            .total_cmp(&a.average_rating())
            .then_with(|| b.rating_count().cmp(&a.rating_count()))
    });

    if candidates.is_empty() && !catalog.is_empty() {
        tracing::warn!(movies = catalog.len(), "User has rated every movie in the catalog");
    }

    candidates
        .into_iter()
        .take(limit)
        .map(|movie| {
            tracing::debug!(
                movie_id = movie.movie_id,
                rating = movie.average_rating(),
                total_ratings = movie.rating_count(),
                "Adding popular fallback"
            );
            Recommendation::new(
                movie.movie_id,
                movie.title.clone(),
                POPULAR_SCORE,
                POPULAR_REASON,
                Algorithm::Popular,
            )
        })
        .collect()
}

/// Merge, falling back to popularity when neither branch had anything
pub fn combine(
    collaborative: Vec<Recommendation>,
    content_based: Vec<Recommendation>,
    catalog: &[Movie],
    rated: &HashSet<MovieId>,
    limit: usize,
) -> Vec<Recommendation> {
    let incoming = collaborative.len() + content_based.len();
    let merged = merge(collaborative, content_based, limit);

    if merged.is_empty() {
        tracing::info!("No recommendations from algorithms, falling back to popular movies");
        return popular_fallback(catalog, rated, limit);
    }

    tracing::info!(
        incoming,
        returned = merged.len(),
        "Hybrid recommendations merged"
    );
    merged
}

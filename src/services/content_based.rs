use std::collections::{HashMap, HashSet};

use crate::models::{rated_movie_ids, Algorithm, Movie, MovieId, Rating, Recommendation};
use crate::services::similarity::jaccard;

/// Ratings at or above this mark a movie as liked
pub const LIKED_RATING_THRESHOLD: u8 = 4;

/// Features extracted once per movie so catalog scans don't reparse strings
#[derive(Debug, Clone, Default)]
struct MovieFeatures {
    genres: Option<HashSet<String>>,
    director: Option<String>,
    cast: Option<HashSet<String>>,
}

impl From<&Movie> for MovieFeatures {
    fn from(movie: &Movie) -> Self {
        Self {
            genres: movie.genre_tags(),
            director: movie.director_name().map(str::to_lowercase),
            cast: movie.cast_names(),
        }
    }
}

impl MovieFeatures {
    /// Mean of the feature scores both sides can be compared on
    fn similarity(&self, other: &Self) -> f64 {
        let mut total = 0.0;
        let mut features = 0;

        if let (Some(a), Some(b)) = (&self.genres, &other.genres) {
            total += jaccard(a, b);
            features += 1;
        }

        if let (Some(a), Some(b)) = (&self.director, &other.director) {
            if a == b {
                total += 1.0;
            }
            features += 1;
        }

        if let (Some(a), Some(b)) = (&self.cast, &other.cast) {
            total += jaccard(a, b);
            features += 1;
        }

        if features == 0 {
            return 0.0;
        }

        total / features as f64
    }
}

/// Feature similarity between two movies in [0, 1]
///
/// Averages genre Jaccard, director equality (case-insensitive) and cast
/// Jaccard, counting only the features populated on both movies. A cast
/// field that fails to parse is left out rather than scored as 0.
pub fn movie_similarity(a: &Movie, b: &Movie) -> f64 {
    MovieFeatures::from(a).similarity(&MovieFeatures::from(b))
}

/// Recommends unseen movies that resemble the ones the user rated highly
///
/// A candidate's score is the rating-weighted mean of its similarity to each
/// liked movie. Candidates with no resemblance at all are dropped; ties keep
/// catalog order.
pub fn recommend(catalog: &[Movie], user_ratings: &[Rating], limit: usize) -> Vec<Recommendation> {
    let by_id: HashMap<MovieId, &Movie> = catalog.iter().map(|m| (m.movie_id, m)).collect();

    // 1. Liked set, resolved against the catalog
    let liked: Vec<(&Movie, MovieFeatures, f64)> = user_ratings
        .iter()
        .filter(|r| r.rating >= LIKED_RATING_THRESHOLD)
        .filter_map(|r| by_id.get(&r.movie_id).map(|m| (*m, f64::from(r.rating))))
        .map(|(movie, weight)| (movie, MovieFeatures::from(movie), weight))
        .collect();

    if liked.is_empty() {
        tracing::debug!(ratings = user_ratings.len(), "No liked movies to compare against");
        return Vec::new();
    }

    let total_weight: f64 = liked.iter().map(|(_, _, weight)| weight).sum();
    let rated = rated_movie_ids(user_ratings);

    // 2. Score every unrated catalog movie
    let mut scored: Vec<(&Movie, f64, &Movie)> = catalog
        .iter()
        .filter(|movie| !rated.contains(&movie.movie_id))
        .filter_map(|movie| {
            let features = MovieFeatures::from(movie);
            let mut weighted = 0.0;
            let mut best: Option<(&Movie, f64)> = None;

            for (liked_movie, liked_features, weight) in &liked {
                let contribution = features.similarity(liked_features) * weight;
                weighted += contribution;
                if best.map_or(true, |(_, b)| contribution > b) {
                    best = Some((*liked_movie, contribution));
                }
            }

            let score = weighted / total_weight;
            match best {
                Some((anchor, _)) if score > 0.0 => Some((movie, score, anchor)),
                _ => None,
            }
        })
        .collect();

    tracing::debug!(
        liked = liked.len(),
        candidates = scored.len(),
        "Content-based scores computed"
    );

    // 3. Rank, stable on catalog order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    scored
        .into_iter()
        .take(limit)
        .map(|(movie, score, anchor)| {
            Recommendation::new(
                movie.movie_id,
                movie.title.clone(),
                score,
                format!("Similar to \"{}\", which you rated highly", anchor.title),
                Algorithm::ContentBased,
            )
        })
        .collect()
}

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{
    Algorithm, Movie, MovieId, Rating, RatingMatrix, Recommendation, UserId, MAX_RATING,
};
use crate::services::similarity::SimilarityMetric;

/// Neighbors whose |similarity| falls below this are ignored entirely
pub const MIN_SIMILARITY_THRESHOLD: f64 = 0.05;

/// Predicted rating for one candidate movie
#[derive(Debug, Clone, Copy, PartialEq)]
struct Prediction {
    rating: f64,
    neighbors: usize,
}

/// User-based collaborative filtering
///
/// Finds users whose rating history correlates with the target user's, then
/// predicts ratings for unseen movies as the similarity-weighted mean of what
/// those neighbors gave them:
///
/// `prediction(m) = Σ sim(n) · rating(n, m) / Σ |sim(n)|`
#[derive(Debug, Clone, Copy)]
pub struct CollaborativeFilter {
    metric: SimilarityMetric,
    min_similarity: f64,
}

impl Default for CollaborativeFilter {
    fn default() -> Self {
        Self::new(SimilarityMetric::default())
    }
}

impl CollaborativeFilter {
    pub fn new(metric: SimilarityMetric) -> Self {
        Self {
            metric,
            min_similarity: MIN_SIMILARITY_THRESHOLD,
        }
    }

    /// Similarity to every other user that clears the threshold
    ///
    /// Returned in ascending user id order.
    pub fn neighbors(
        &self,
        user_id: UserId,
        target: &HashMap<MovieId, u8>,
        matrix: &RatingMatrix,
    ) -> Vec<(UserId, f64)> {
        let mut neighbors: Vec<(UserId, f64)> = matrix
            .iter()
            .filter(|(other_id, _)| **other_id != user_id)
            .map(|(other_id, other)| (*other_id, self.metric.compute(target, other)))
            .filter(|(_, similarity)| similarity.abs() >= self.min_similarity)
            .collect();

        neighbors.sort_by_key(|(other_id, _)| *other_id);
        neighbors
    }

    /// Predicted ratings (1-5 scale) for every movie a neighbor rated and the
    /// user has not
    pub fn predict_ratings(
        &self,
        user_id: UserId,
        matrix: &RatingMatrix,
        user_ratings: &[Rating],
    ) -> HashMap<MovieId, f64> {
        self.predict(user_id, matrix, user_ratings)
            .into_iter()
            .map(|(movie_id, prediction)| (movie_id, prediction.rating))
            .collect()
    }

    fn predict(
        &self,
        user_id: UserId,
        matrix: &RatingMatrix,
        user_ratings: &[Rating],
    ) -> BTreeMap<MovieId, Prediction> {
        // 1. No history means nothing to correlate on
        if user_ratings.is_empty() {
            return BTreeMap::new();
        }

        let target: HashMap<MovieId, u8> = RatingMatrix::from_ratings(user_ratings)
            .user(user_id)
            .cloned()
            .unwrap_or_else(|| user_ratings.iter().map(|r| (r.movie_id, r.rating)).collect());

        let mut rated: HashSet<MovieId> = matrix.rated_by(user_id);
        rated.extend(target.keys().copied());

        // 2. Keep only users that correlate strongly enough
        let neighbors = self.neighbors(user_id, &target, matrix);
        if neighbors.is_empty() {
            tracing::debug!(user_id, "No neighbors above similarity threshold");
            return BTreeMap::new();
        }

        // 3. Similarity-weighted mean of neighbor ratings per unseen movie
        let mut sums: BTreeMap<MovieId, (f64, f64, usize)> = BTreeMap::new();
        for (neighbor_id, similarity) in &neighbors {
            let Some(row) = matrix.user(*neighbor_id) else {
                continue;
            };
            for (movie_id, rating) in row {
                if rated.contains(movie_id) {
                    continue;
                }
                let entry = sums.entry(*movie_id).or_insert((0.0, 0.0, 0));
                entry.0 += similarity * f64::from(*rating);
                entry.1 += similarity.abs();
                entry.2 += 1;
            }
        }

        tracing::debug!(
            user_id,
            neighbors = neighbors.len(),
            candidates = sums.len(),
            "Collaborative predictions computed"
        );

        sums.into_iter()
            .filter(|(_, (_, weight, _))| *weight > 0.0)
            .map(|(movie_id, (weighted, weight, count))| {
                (
                    movie_id,
                    Prediction {
                        rating: weighted / weight,
                        neighbors: count,
                    },
                )
            })
            .collect()
    }

    /// Top `limit` unseen movies by predicted rating
    ///
    /// Score is the prediction divided by the top of the rating scale. Equal
    /// predictions keep ascending movie id order.
    pub fn recommend(
        &self,
        user_id: UserId,
        matrix: &RatingMatrix,
        catalog: &[Movie],
        user_ratings: &[Rating],
        limit: usize,
    ) -> Vec<Recommendation> {
        let predictions = self.predict(user_id, matrix, user_ratings);
        if predictions.is_empty() {
            return Vec::new();
        }

        let titles: HashMap<MovieId, &str> = catalog
            .iter()
            .map(|movie| (movie.movie_id, movie.title.as_str()))
            .collect();

        // 4. Rank; BTreeMap iteration plus a stable sort keeps ties by id
        let mut ranked: Vec<(MovieId, Prediction)> = predictions.into_iter().collect();
        ranked.sort_by(|a, b| b.1.rating.total_cmp(&a.1.rating));

        ranked
            .into_iter()
            .take(limit)
            .map(|(movie_id, prediction)| {
                let title = titles
                    .get(&movie_id)
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| format!("Movie #{}", movie_id));
                let noun = if prediction.neighbors == 1 { "user" } else { "users" };

                Recommendation::new(
                    movie_id,
                    title,
                    prediction.rating / f64::from(MAX_RATING),
                    format!(
                        "{} {} with similar taste predict you'd rate this {:.1}/5",
                        prediction.neighbors, noun, prediction.rating
                    ),
                    Algorithm::Collaborative,
                )
            })
            .collect()
    }
}

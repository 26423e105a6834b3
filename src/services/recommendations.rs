use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{
        rated_movie_ids, valid_ratings, Movie, MovieId, Rating, RatingMatrix, Recommendation,
        UserId,
    },
    services::{
        collaborative::CollaborativeFilter, content_based, hybrid,
        providers::MovieDataProvider, similarity::SimilarityMetric,
    },
};

/// Generates personalized movie recommendations
///
/// Each call first reads what it needs from the [`MovieDataProvider`]
/// (concurrently, with failed reads degraded to empty collections), then runs
/// the side-effect-free scoring code on the complete snapshot.
#[derive(Clone)]
pub struct RecommendationService {
    provider: Arc<dyn MovieDataProvider>,
    collaborative: CollaborativeFilter,
}

/// Substitutes an empty collection for a failed upstream read
fn or_empty<T: Default>(result: AppResult<T>, source: &'static str, provider: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(
            error = %e,
            source,
            provider,
            "Upstream read failed, continuing with empty data"
        );
        T::default()
    })
}

impl RecommendationService {
    pub fn new(provider: Arc<dyn MovieDataProvider>, metric: SimilarityMetric) -> Self {
        Self {
            provider,
            collaborative: CollaborativeFilter::new(metric),
        }
    }

    async fn movies(&self) -> Vec<Movie> {
        or_empty(self.provider.fetch_movies().await, "movies", self.provider.name())
    }

    async fn user_ratings(&self, user_id: UserId) -> Vec<Rating> {
        valid_ratings(or_empty(
            self.provider.fetch_user_ratings(user_id).await,
            "user_ratings",
            self.provider.name(),
        ))
    }

    async fn rating_matrix(&self) -> RatingMatrix {
        let ratings = or_empty(
            self.provider.fetch_all_ratings().await,
            "all_ratings",
            self.provider.name(),
        );
        let matrix = RatingMatrix::from_ratings(&ratings);
        if matrix.is_empty() {
            tracing::debug!("Rating matrix is empty, collaborative filtering has no neighbors");
        }
        matrix
    }

    /// User-based collaborative filtering only
    pub async fn collaborative(&self, user_id: UserId, limit: usize) -> Vec<Recommendation> {
        tracing::info!(user_id, limit, "Getting collaborative filtering recommendations");

        let user_ratings = self.user_ratings(user_id).await;
        if user_ratings.is_empty() {
            return Vec::new();
        }

        let (matrix, catalog) = tokio::join!(self.rating_matrix(), self.movies());

        self.collaborative
            .recommend(user_id, &matrix, &catalog, &user_ratings, limit)
    }

    /// Content-based filtering only
    pub async fn content_based(&self, user_id: UserId, limit: usize) -> Vec<Recommendation> {
        tracing::info!(user_id, limit, "Getting content-based recommendations");

        let (user_ratings, catalog) = tokio::join!(self.user_ratings(user_id), self.movies());
        if user_ratings.is_empty() {
            return Vec::new();
        }

        content_based::recommend(&catalog, &user_ratings, limit)
    }

    /// Both filters merged, with a popularity fallback for cold-start users
    pub async fn hybrid(&self, user_id: UserId, limit: usize) -> Vec<Recommendation> {
        tracing::info!(user_id, limit, "Getting hybrid recommendations");

        // 1. Fetch everything up front, concurrently
        let (user_ratings, matrix, catalog) = tokio::join!(
            self.user_ratings(user_id),
            self.rating_matrix(),
            self.movies()
        );

        let user_ratings = Arc::new(user_ratings);
        let matrix = Arc::new(matrix);
        let catalog = Arc::new(catalog);

        // 2. Score both branches on the blocking pool
        let collaborative_task = {
            let filter = self.collaborative;
            let (user_ratings, matrix, catalog) =
                (user_ratings.clone(), matrix.clone(), catalog.clone());
            tokio::task::spawn_blocking(move || {
                filter.recommend(user_id, &matrix, &catalog, &user_ratings, limit)
            })
        };

        let content_task = {
            let (user_ratings, catalog) = (user_ratings.clone(), catalog.clone());
            tokio::task::spawn_blocking(move || {
                content_based::recommend(&catalog, &user_ratings, limit)
            })
        };

        let (collaborative, content) = tokio::join!(collaborative_task, content_task);

        let collaborative = collaborative.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Collaborative branch failed");
            Vec::new()
        });
        let content = content.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Content-based branch failed");
            Vec::new()
        });

        tracing::debug!(
            user_id,
            collaborative = collaborative.len(),
            content_based = content.len(),
            "Branch results collected"
        );

        // 3. Merge (collaborative first) or fall back to popular movies. The
        // user's matrix row still counts as rated when their own read failed.
        let mut rated = rated_movie_ids(&user_ratings);
        rated.extend(matrix.rated_by(user_id));
        hybrid::combine(collaborative, content, &catalog, &rated, limit)
    }

    /// Raw collaborative rating predictions, for offline evaluation
    pub async fn predicted_ratings(&self, user_id: UserId) -> HashMap<MovieId, f64> {
        let (user_ratings, matrix) =
            tokio::join!(self.user_ratings(user_id), self.rating_matrix());

        self.collaborative
            .predict_ratings(user_id, &matrix, &user_ratings)
    }
}

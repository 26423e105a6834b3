use crate::{
    error::AppResult,
    models::{Movie, Rating, UserId},
    services::providers::MovieDataProvider,
};

/// Serves a fixed catalog and rating snapshot
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    movies: Vec<Movie>,
    ratings: Vec<Rating>,
}

impl InMemoryProvider {
    pub fn new(movies: Vec<Movie>, ratings: Vec<Rating>) -> Self {
        Self { movies, ratings }
    }
}

#[async_trait::async_trait]
impl MovieDataProvider for InMemoryProvider {
    async fn fetch_movies(&self) -> AppResult<Vec<Movie>> {
        Ok(self.movies.clone())
    }

    async fn fetch_user_ratings(&self, user_id: UserId) -> AppResult<Vec<Rating>> {
        Ok(self
            .ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn fetch_all_ratings(&self) -> AppResult<Vec<Rating>> {
        Ok(self.ratings.clone())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

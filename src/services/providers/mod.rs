/// Movie data provider abstraction
///
/// The recommendation engine never owns catalog or rating storage. It reads
/// snapshots through this trait: over HTTP from the movie service in
/// production, or from a fixed in-memory snapshot in tests and local runs.
use crate::{
    error::AppResult,
    models::{Movie, Rating, UserId},
};

pub mod in_memory;
pub mod movie_service;

pub use in_memory::InMemoryProvider;
pub use movie_service::MovieServiceProvider;

/// Read-only access to the catalog and rating store
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieDataProvider: Send + Sync {
    /// Full movie catalog
    async fn fetch_movies(&self) -> AppResult<Vec<Movie>>;

    /// Every rating the given user has made
    async fn fetch_user_ratings(&self, user_id: UserId) -> AppResult<Vec<Rating>>;

    /// Every rating across all users
    async fn fetch_all_ratings(&self) -> AppResult<Vec<Rating>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

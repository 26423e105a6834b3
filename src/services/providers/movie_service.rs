/// HTTP provider backed by the movie catalog service
///
/// Endpoints used:
/// 1. `GET /movies` → full catalog
/// 2. `GET /ratings/user/{id}` → one user's ratings
/// 3. `GET /ratings` → every rating, for the collaborative matrix
use crate::{
    error::{AppError, AppResult},
    models::{Movie, Rating, UserId},
    services::providers::MovieDataProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone)]
pub struct MovieServiceProvider {
    http_client: HttpClient,
    base_url: String,
}

impl MovieServiceProvider {
    /// Creates a provider whose every request gives up after `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetches a JSON array from `path` under the base URL
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<Vec<T>> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(url = %url, "Fetching from movie service");

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                url = %url,
                status = %status,
                body = %body,
                "Movie service request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Movie service returned status {}: {}",
                status, body
            )));
        }

        let items: Vec<T> = response.json().await?;

        tracing::debug!(url = %url, count = items.len(), "Movie service response parsed");

        Ok(items)
    }
}

#[async_trait::async_trait]
impl MovieDataProvider for MovieServiceProvider {
    async fn fetch_movies(&self) -> AppResult<Vec<Movie>> {
        self.get_json("/movies").await
    }

    async fn fetch_user_ratings(&self, user_id: UserId) -> AppResult<Vec<Rating>> {
        self.get_json(&format!("/ratings/user/{}", user_id)).await
    }

    async fn fetch_all_ratings(&self) -> AppResult<Vec<Rating>> {
        self.get_json("/ratings").await
    }

    fn name(&self) -> &'static str {
        "movie-service"
    }
}

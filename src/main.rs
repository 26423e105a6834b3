use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use movie_recommender::{
    config::Config,
    routes::{create_router, AppState},
    services::{providers::MovieServiceProvider, RecommendationService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Upstream catalog / rating reads
    let provider = MovieServiceProvider::new(
        config.movie_service_url.clone(),
        Duration::from_secs(config.fetch_timeout_secs),
    )?;

    tracing::info!(
        movie_service_url = %config.movie_service_url,
        similarity_metric = ?config.similarity_metric,
        "Movie data provider configured"
    );

    let recommender = RecommendationService::new(Arc::new(provider), config.similarity_metric);
    let state = Arc::new(AppState::new(recommender, &config));

    // Create the router with all routes
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::RecommendationService,
};

pub mod evaluation;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub recommender: RecommendationService,
    pub default_limit: usize,
    pub max_limit: usize,
}

impl AppState {
    pub fn new(recommender: RecommendationService, config: &Config) -> Self {
        Self {
            recommender,
            default_limit: config.default_limit,
            max_limit: config.max_limit,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/recommendations/user/:user_id",
            get(recommendations::recommend),
        )
        .route(
            "/recommendations/user/:user_id/collaborative",
            get(recommendations::collaborative),
        )
        .route(
            "/recommendations/user/:user_id/content-based",
            get(recommendations::content_based),
        )
        .route(
            "/recommendations/user/:user_id/hybrid",
            get(recommendations::hybrid),
        )
        .route(
            "/recommendations/user/:user_id/predictions",
            get(recommendations::predictions),
        )
        .route("/evaluation", post(evaluation::evaluate))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{MovieId, Recommendation, UserId},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    limit: Option<usize>,
}

impl LimitQuery {
    /// Caller's limit, or the configured default; rejects anything over the max
    fn resolve(&self, state: &AppState) -> AppResult<usize> {
        let limit = self.limit.unwrap_or(state.default_limit);
        if limit > state.max_limit {
            return Err(AppError::InvalidInput(format!(
                "limit must be at most {}",
                state.max_limit
            )));
        }
        Ok(limit)
    }
}

/// Default recommendations endpoint (hybrid)
pub async fn recommend(
    state: State<Arc<AppState>>,
    request_id: Extension<RequestId>,
    user_id: Path<UserId>,
    query: Query<LimitQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    hybrid(state, request_id, user_id, query).await
}

/// Handler for hybrid recommendations
pub async fn hybrid(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<UserId>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let limit = query.resolve(&state)?;
    let recommendations = state.recommender.hybrid(user_id, limit).await;

    tracing::info!(
        request_id = %request_id,
        user_id,
        returned = recommendations.len(),
        "Hybrid recommendations served"
    );

    Ok(Json(recommendations))
}

/// Handler for collaborative filtering recommendations
pub async fn collaborative(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<UserId>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let limit = query.resolve(&state)?;
    let recommendations = state.recommender.collaborative(user_id, limit).await;

    tracing::info!(
        request_id = %request_id,
        user_id,
        returned = recommendations.len(),
        "Collaborative recommendations served"
    );

    Ok(Json(recommendations))
}

/// Handler for content-based recommendations
pub async fn content_based(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<UserId>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let limit = query.resolve(&state)?;
    let recommendations = state.recommender.content_based(user_id, limit).await;

    tracing::info!(
        request_id = %request_id,
        user_id,
        returned = recommendations.len(),
        "Content-based recommendations served"
    );

    Ok(Json(recommendations))
}

/// Handler for raw collaborative rating predictions
pub async fn predictions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> Json<HashMap<MovieId, f64>> {
    Json(state.recommender.predicted_ratings(user_id).await)
}

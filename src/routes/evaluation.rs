use axum::{extract::Query, Json};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::EvaluationResult,
    services::evaluation::{self, EvaluationInput, DEFAULT_K},
};

#[derive(Debug, Deserialize)]
pub struct EvaluationQuery {
    k: Option<usize>,
}

/// Scores a set of predictions and recommendations against ground truth
pub async fn evaluate(
    Query(query): Query<EvaluationQuery>,
    Json(input): Json<EvaluationInput>,
) -> AppResult<Json<EvaluationResult>> {
    let k = query.k.unwrap_or(DEFAULT_K);
    if k == 0 {
        return Err(AppError::InvalidInput("k must be positive".to_string()));
    }

    tracing::info!(
        k,
        recommendations = input.recommendations.len(),
        relevant = input.relevant.len(),
        predictions = input.predicted.len(),
        "Processing evaluation request"
    );

    Ok(Json(evaluation::evaluate(&input, k)))
}

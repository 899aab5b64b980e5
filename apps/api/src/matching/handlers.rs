//! Axum route handler for the Matching API.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::matching::evaluator::MatchResult;
use crate::state::AppState;

/// GET /match/:candidate_id/:job_id
///
/// Scores one candidate against one job with the language model and records the
/// outcome on the candidate. An unreadable model answer still returns 200 with
/// status "Error in processing".
pub async fn handle_match(
    State(state): State<AppState>,
    Path((candidate_id, job_id)): Path<(String, String)>,
) -> Result<Json<MatchResult>, AppError> {
    let result = state.evaluator.evaluate(&candidate_id, &job_id).await?;
    Ok(Json(result))
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidatePatch, CreateCandidateRequest, UpdateCandidateRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub count: usize,
    pub results: Vec<Candidate>,
}

/// GET /candidates/
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<CandidateListResponse>, AppError> {
    let results = state.store.list_candidates().await?;
    Ok(Json(CandidateListResponse {
        count: results.len(),
        results,
    }))
}

/// POST /candidates/
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    payload: Result<Json<CreateCandidateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    let Json(request) = payload?;
    let candidate = state.store.create_candidate(request.validate()?).await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

/// GET /candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Candidate>, AppError> {
    let candidate = state
        .store
        .get_candidate(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))?;
    Ok(Json(candidate))
}

/// PATCH /candidates/:id
///
/// Partial update of profile fields and status. Match score and evaluation time
/// are only written by the matching endpoint.
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCandidateRequest>, JsonRejection>,
) -> Result<Json<Candidate>, AppError> {
    let Json(request) = payload?;
    let candidate = state
        .store
        .update_candidate(&id, CandidatePatch::from(request))
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))?;
    Ok(Json(candidate))
}

/// DELETE /candidates/:id
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_candidate(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Candidate not found".to_string()))
    }
}

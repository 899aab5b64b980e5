use std::path::Path;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::CandidatePatch;
use crate::models::resume::{NewResume, Resume, RESUME_STATUS_PENDING, RESUME_STATUS_PROCESSED};
use crate::resumes::extract::{extract_text, sanitize_filename};
use crate::state::AppState;

/// GET /resumes/
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.store.list_resumes().await?))
}

/// POST /resumes/
///
/// Multipart form: `file` (required) and `candidateId` (optional). The file is
/// written to the upload directory as `<uuid>_<sanitized name>`. When text can be
/// extracted and the candidate exists, the text becomes the candidate's resume text.
/// The body is capped at `max_upload_bytes`; larger uploads fail with 413.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let mut multipart = multipart?;
    let mut upload: Option<(String, Bytes)> = None;
    let mut candidate_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                upload = Some((file_name, data));
            }
            "candidateId" => {
                let value = field.text().await?;
                let value = value.trim();
                if !value.is_empty() {
                    candidate_id = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    let (file_name, data) = upload.ok_or_else(|| AppError::Validation("No file part".to_string()))?;
    if file_name.is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }

    let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(&file_name));
    save_upload(&state.config.upload_dir, &stored_name, &data).await?;

    let resume_text = extract_text(&file_name, data).await;
    let status = if resume_text.is_some() {
        RESUME_STATUS_PROCESSED
    } else {
        RESUME_STATUS_PENDING
    };

    let resume = state
        .store
        .create_resume(NewResume {
            candidate_id: candidate_id.clone(),
            file_name,
            file_url: format!("/uploads/{stored_name}"),
            status: status.to_string(),
        })
        .await?;

    if let (Some(candidate_id), Some(text)) = (candidate_id, resume_text) {
        let patch = CandidatePatch {
            resume_id: Some(Some(resume.id.clone())),
            resume_text: Some(Some(text)),
            ..Default::default()
        };
        match state.store.update_candidate(&candidate_id, patch).await? {
            Some(_) => info!("Attached resume {} to candidate {candidate_id}", resume.id),
            None => warn!("Resume {} references unknown candidate {candidate_id}", resume.id),
        }
    }

    Ok((StatusCode::CREATED, Json(resume)))
}

async fn save_upload(upload_dir: &str, stored_name: &str, data: &[u8]) -> Result<(), AppError> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Storage(format!("cannot create {upload_dir}: {e}")))?;

    let path = Path::new(upload_dir).join(stored_name);
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::Storage(format!("cannot write {}: {e}", path.display())))?;

    info!("Saved upload to {}", path.display());
    Ok(())
}

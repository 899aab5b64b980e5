//! Outbound email stub. Messages are logged, never delivered.

use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::require_fields;

#[derive(Debug, Default, Deserialize)]
pub struct SendEmailRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub message: String,
    pub to: String,
    pub subject: String,
}

/// POST /send-email/
pub async fn handle_send_email(
    payload: Result<Json<SendEmailRequest>, JsonRejection>,
) -> Result<Json<SendEmailResponse>, AppError> {
    let Json(request) = payload?;
    require_fields(&[
        ("to", request.to.is_some()),
        ("subject", request.subject.is_some()),
        ("body", request.body.is_some()),
    ])?;

    let to = request.to.unwrap_or_default();
    let subject = request.subject.unwrap_or_default();
    info!(
        "Email to be sent to {to} with subject: {subject} ({} body chars)",
        request.body.as_deref().map(str::len).unwrap_or(0)
    );

    Ok(Json(SendEmailResponse {
        message: "Email queued successfully".to_string(),
        to,
        subject,
    }))
}

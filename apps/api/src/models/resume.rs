use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const RESUME_STATUS_PENDING: &str = "pending";
/// Text was extracted from the upload.
pub const RESUME_STATUS_PROCESSED: &str = "processed";

/// An uploaded resume file. `candidate_id` is a soft reference and is not
/// checked against the candidates table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: String,
    pub candidate_id: Option<String>,
    pub file_name: String,
    pub file_url: String,
    pub status: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResume {
    pub candidate_id: Option<String>,
    pub file_name: String,
    pub file_url: String,
    pub status: String,
}

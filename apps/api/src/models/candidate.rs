use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{types::Json, FromRow};

use crate::errors::AppError;
use crate::models::require_fields;

// Candidate status labels. Storage does not enforce them; evaluation overwrites
// whatever is present with one of the last three.
pub const STATUS_NEW: &str = "New";
pub const STATUS_SHORTLISTED: &str = "Shortlisted";
pub const STATUS_UNDER_REVIEW: &str = "Under Review";
/// Sentinel written when the model answer carries no usable match percentage.
pub const STATUS_PROCESSING_ERROR: &str = "Error in processing";

/// A candidate. `match_score` and `status` describe the most recent evaluation
/// and only mean something together with `last_evaluated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub resume_id: Option<String>,
    pub resume_text: Option<String>,
    pub status: String,
    pub match_score: f64,
    pub last_evaluated: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct CandidateRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub skills: Json<Vec<String>>,
    pub resume_id: Option<String>,
    pub resume_text: Option<String>,
    pub status: String,
    pub match_score: f64,
    pub last_evaluated: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<CandidateRow> for Candidate {
    fn from(row: CandidateRow) -> Self {
        Candidate {
            skills: row.skills.0,
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            resume_id: row.resume_id,
            resume_text: row.resume_text,
            status: row.status,
            match_score: row.match_score,
            last_evaluated: row.last_evaluated,
            created_at: row.created_at,
        }
    }
}

/// Validated input for creating a candidate.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub resume_id: Option<String>,
    pub resume_text: Option<String>,
    pub match_score: f64,
}

/// POST /candidates/ body. `name`, `email` and `skills` are required.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<Vec<String>>,
    pub resume_id: Option<String>,
    pub resume_text: Option<String>,
    pub match_score: Option<f64>,
}

impl CreateCandidateRequest {
    pub fn validate(self) -> Result<NewCandidate, AppError> {
        require_fields(&[
            ("name", self.name.is_some()),
            ("email", self.email.is_some()),
            ("skills", self.skills.is_some()),
        ])?;

        let CreateCandidateRequest {
            name: Some(name),
            email: Some(email),
            skills: Some(skills),
            phone,
            resume_id,
            resume_text,
            match_score,
        } = self
        else {
            return Err(AppError::Validation("Invalid candidate payload".to_string()));
        };

        Ok(NewCandidate {
            name,
            email,
            phone: phone.filter(|p| !p.is_empty()),
            skills,
            resume_id: resume_id.filter(|r| !r.is_empty()),
            resume_text,
            match_score: match_score.unwrap_or(0.0),
        })
    }
}

/// Partial overwrite of a candidate row. `None` leaves the column untouched; for the
/// nullable columns `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct CandidatePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub skills: Option<Vec<String>>,
    pub resume_id: Option<Option<String>>,
    pub resume_text: Option<Option<String>>,
    pub status: Option<String>,
    pub match_score: Option<f64>,
    pub last_evaluated: Option<DateTime<Utc>>,
}

impl CandidatePatch {
    /// The only fields a match evaluation is allowed to touch.
    pub fn evaluation(match_score: f64, status: &str, evaluated_at: DateTime<Utc>) -> Self {
        CandidatePatch {
            match_score: Some(match_score),
            status: Some(status.to_string()),
            last_evaluated: Some(evaluated_at),
            ..Default::default()
        }
    }
}

/// PATCH /candidates/:id body. Score and evaluation time are owned by matching
/// and cannot be set here. An explicit `null` for `phone`, `resumeId` or
/// `resumeText` clears the field; an absent key leaves it alone.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    pub skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub resume_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub resume_text: Option<Option<String>>,
    pub status: Option<String>,
}

/// Marks a key as present, so `null` becomes `Some(None)` instead of `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<UpdateCandidateRequest> for CandidatePatch {
    fn from(req: UpdateCandidateRequest) -> Self {
        CandidatePatch {
            name: req.name,
            email: req.email,
            phone: req.phone,
            skills: req.skills,
            resume_id: req.resume_id,
            resume_text: req.resume_text,
            status: req.status,
            ..Default::default()
        }
    }
}

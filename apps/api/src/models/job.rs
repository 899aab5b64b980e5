use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

use crate::errors::AppError;
use crate::models::require_fields;

/// New postings start open; `closed` is the only other value.
pub const JOB_STATUS_OPEN: &str = "open";

/// A job posting. `created_at` is set once at creation and never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub skills: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Raw `jobs` row; skills are stored as a JSON array in TEXT.
#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub skills: Json<Vec<String>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            skills: row.skills.0,
            id: row.id,
            title: row.title,
            description: row.description,
            company: row.company,
            location: row.location,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Validated input for creating a job.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub skills: Vec<String>,
}

/// POST /jobs/ body. Every field is required; absence is reported together.
#[derive(Debug, Default, Deserialize)]
pub struct CreateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl CreateJobRequest {
    pub fn validate(self) -> Result<NewJob, AppError> {
        require_fields(&[
            ("title", self.title.is_some()),
            ("description", self.description.is_some()),
            ("company", self.company.is_some()),
            ("location", self.location.is_some()),
            ("skills", self.skills.is_some()),
        ])?;

        match self {
            CreateJobRequest {
                title: Some(title),
                description: Some(description),
                company: Some(company),
                location: Some(location),
                skills: Some(skills),
            } => Ok(NewJob {
                title,
                description,
                company,
                location,
                skills,
            }),
            _ => Err(AppError::Validation("Invalid job payload".to_string())),
        }
    }
}

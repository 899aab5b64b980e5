//! Storage — the persistence seam the matching pipeline and handlers depend on.
//!
//! `AppState` holds an `Arc<dyn Store>`; `SqliteStore` is the production backend.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidatePatch, NewCandidate};
use crate::models::job::{Job, NewJob};
use crate::models::resume::{NewResume, Resume};

pub mod sqlite;

pub use sqlite::SqliteStore;

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_job(&self, job: NewJob) -> Result<Job, AppError>;
    async fn list_jobs(&self) -> Result<Vec<Job>, AppError>;
    async fn get_job(&self, id: &str) -> Result<Option<Job>, AppError>;

    async fn create_candidate(&self, candidate: NewCandidate) -> Result<Candidate, AppError>;
    async fn list_candidates(&self) -> Result<Vec<Candidate>, AppError>;
    async fn get_candidate(&self, id: &str) -> Result<Option<Candidate>, AppError>;
    /// Applies a partial overwrite and returns the updated record,
    /// or `None` when no candidate has this id.
    async fn update_candidate(
        &self,
        id: &str,
        patch: CandidatePatch,
    ) -> Result<Option<Candidate>, AppError>;
    /// Returns whether a row was removed. Resumes are left alone.
    async fn delete_candidate(&self, id: &str) -> Result<bool, AppError>;

    async fn create_resume(&self, resume: NewResume) -> Result<Resume, AppError>;
    async fn list_resumes(&self) -> Result<Vec<Resume>, AppError>;
}

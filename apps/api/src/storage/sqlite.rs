use async_trait::async_trait;
use chrono::Utc;
use sqlx::{types::Json, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{
    Candidate, CandidatePatch, CandidateRow, NewCandidate, STATUS_NEW,
};
use crate::models::job::{Job, JobRow, NewJob, JOB_STATUS_OPEN};
use crate::models::resume::{NewResume, Resume};
use crate::storage::Store;

/// sqlx-backed store over a single SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn create_job(&self, job: NewJob) -> Result<Job, AppError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (id, title, description, company, location, skills, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.company)
        .bind(&job.location)
        .bind(Json(&job.skills))
        .bind(JOB_STATUS_OPEN)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!("Created job {} ({})", row.id, row.title);
        Ok(Job::from(row))
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, AppError> {
        let rows = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at, rowid")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn get_job(&self, id: &str) -> Result<Option<Job>, AppError> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Job::from))
    }

    async fn create_candidate(&self, candidate: NewCandidate) -> Result<Candidate, AppError> {
        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            INSERT INTO candidates
                (id, name, email, phone, skills, resume_id, resume_text, status, match_score, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(&candidate.phone)
        .bind(Json(&candidate.skills))
        .bind(&candidate.resume_id)
        .bind(&candidate.resume_text)
        .bind(STATUS_NEW)
        .bind(candidate.match_score)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!("Created candidate {}", row.id);
        Ok(Candidate::from(row))
    }

    async fn list_candidates(&self) -> Result<Vec<Candidate>, AppError> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            "SELECT * FROM candidates ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Candidate::from).collect())
    }

    async fn get_candidate(&self, id: &str) -> Result<Option<Candidate>, AppError> {
        let row = sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Candidate::from))
    }

    async fn update_candidate(
        &self,
        id: &str,
        patch: CandidatePatch,
    ) -> Result<Option<Candidate>, AppError> {
        // NULL binds keep the current column value. Nullable columns take a
        // presence flag followed by the new value, which may itself be NULL.
        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            UPDATE candidates SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                phone = CASE WHEN ? THEN ? ELSE phone END,
                skills = COALESCE(?, skills),
                resume_id = CASE WHEN ? THEN ? ELSE resume_id END,
                resume_text = CASE WHEN ? THEN ? ELSE resume_text END,
                status = COALESCE(?, status),
                match_score = COALESCE(?, match_score),
                last_evaluated = COALESCE(?, last_evaluated)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.phone.is_some())
        .bind(patch.phone.flatten())
        .bind(patch.skills.map(Json))
        .bind(patch.resume_id.is_some())
        .bind(patch.resume_id.flatten())
        .bind(patch.resume_text.is_some())
        .bind(patch.resume_text.flatten())
        .bind(patch.status)
        .bind(patch.match_score)
        .bind(patch.last_evaluated)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Candidate::from))
    }

    async fn delete_candidate(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM candidates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_resume(&self, resume: NewResume) -> Result<Resume, AppError> {
        let row = sqlx::query_as::<_, Resume>(
            r#"
            INSERT INTO resumes (id, candidate_id, file_name, file_url, status, uploaded_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&resume.candidate_id)
        .bind(&resume.file_name)
        .bind(&resume.file_url)
        .bind(&resume.status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!("Stored resume {} at {}", row.id, row.file_url);
        Ok(row)
    }

    async fn list_resumes(&self) -> Result<Vec<Resume>, AppError> {
        let rows = sqlx::query_as::<_, Resume>("SELECT * FROM resumes ORDER BY uploaded_at, rowid")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::db::create_pool;

    pub async fn memory_store() -> SqliteStore {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        SqliteStore::new(pool)
    }

    pub fn new_job(skills: &[&str]) -> NewJob {
        NewJob {
            title: "Backend Engineer".to_string(),
            description: "Build matching services".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn new_candidate(skills: &[&str], resume_text: Option<&str>) -> NewCandidate {
        NewCandidate {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            resume_id: None,
            resume_text: resume_text.map(str::to_string),
            match_score: 0.0,
        }
    }
}

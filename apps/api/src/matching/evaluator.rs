//! Match Evaluator — fetch, prompt, one inference call, parse, persist.
//!
//! Failure kinds stay distinct: a missing candidate or job is `NotFound`, a backend
//! failure is `Inference`, and only an unreadable model answer degrades to the
//! `Error in processing` sentinel (returned as a successful result).

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::inference::InferenceBackend;
use crate::matching::parser::{classify, extract_match_percentage, ScoreExtraction};
use crate::matching::prompts::build_match_prompt;
use crate::models::candidate::CandidatePatch;
use crate::storage::Store;

/// Caller-facing outcome of one evaluation. Only score, status and the evaluation
/// time are written back onto the candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub candidate_id: String,
    pub job_id: String,
    pub match_score: f64,
    pub status: String,
    pub analysis: String,
    pub timestamp: String,
}

#[derive(Clone)]
pub struct MatchEvaluator {
    store: Arc<dyn Store>,
    inference: Arc<dyn InferenceBackend>,
    model: String,
}

impl MatchEvaluator {
    pub fn new(store: Arc<dyn Store>, inference: Arc<dyn InferenceBackend>, model: String) -> Self {
        Self {
            store,
            inference,
            model,
        }
    }

    pub async fn evaluate(&self, candidate_id: &str, job_id: &str) -> Result<MatchResult, AppError> {
        let candidate = self
            .store
            .get_candidate(candidate_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))?;
        let job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

        let prompt = build_match_prompt(&job, &candidate);
        let analysis = self.inference.complete(&prompt, &self.model).await?;

        let extraction = extract_match_percentage(&analysis);
        if let ScoreExtraction::Unparseable { reason } = &extraction {
            warn!(
                "Match score for candidate {candidate_id} / job {job_id} could not be read ({reason}); \
                 recording sentinel status"
            );
        }
        let (match_score, status) = classify(&extraction);

        let evaluated_at = Utc::now();
        let updated = self
            .store
            .update_candidate(
                candidate_id,
                CandidatePatch::evaluation(match_score, status, evaluated_at),
            )
            .await?;
        if updated.is_none() {
            // Deleted while the model was running; nothing to write back.
            warn!("Candidate {candidate_id} disappeared before its match result was saved");
        }

        info!("Evaluated candidate {candidate_id} against job {job_id}: {match_score} ({status})");

        Ok(MatchResult {
            candidate_id: candidate_id.to_string(),
            job_id: job_id.to_string(),
            match_score,
            status: status.to_string(),
            analysis,
            timestamp: iso_timestamp(Utc::now()),
        })
    }
}

fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::inference::{InferenceBackend, InferenceError};

    /// Inference double that replays a canned answer and counts calls.
    pub struct ScriptedBackend {
        reply: Result<String, u16>,
        pub calls: AtomicUsize,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InferenceBackend for ScriptedBackend {
        async fn complete(&self, prompt: &str, _model: &str) -> Result<String, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(InferenceError::Api {
                    status: *status,
                    message: "model not loaded".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::ScriptedBackend;
    use super::*;
    use crate::models::candidate::{
        Candidate, NewCandidate, STATUS_PROCESSING_ERROR, STATUS_SHORTLISTED, STATUS_UNDER_REVIEW,
    };
    use crate::models::job::{Job, NewJob};
    use crate::models::resume::{NewResume, Resume};
    use crate::storage::sqlite::test_support::{memory_store, new_candidate, new_job};
    use crate::storage::SqliteStore;

    struct Fixture {
        store: Arc<SqliteStore>,
        backend: Arc<ScriptedBackend>,
        evaluator: MatchEvaluator,
        job: Job,
        candidate: Candidate,
    }

    async fn fixture(backend: ScriptedBackend) -> Fixture {
        let store = Arc::new(memory_store().await);
        let backend = Arc::new(backend);
        let job = store.create_job(new_job(&["Rust", "SQL"])).await.unwrap();
        let candidate = store
            .create_candidate(new_candidate(&["Rust", "Go"], Some("Ten years of systems work")))
            .await
            .unwrap();
        let evaluator = MatchEvaluator::new(store.clone(), backend.clone(), "mistral".to_string());
        Fixture {
            store,
            backend,
            evaluator,
            job,
            candidate,
        }
    }

    #[tokio::test]
    async fn test_high_score_is_shortlisted_and_persisted() {
        let reply = "Match percentage: 82 \nTop 3 matching qualifications: Rust ...";
        let fx = fixture(ScriptedBackend::replying(reply)).await;
        let before = Utc::now();

        let result = fx.evaluator.evaluate(&fx.candidate.id, &fx.job.id).await.unwrap();

        assert_eq!(result.match_score, 82.0);
        assert_eq!(result.status, STATUS_SHORTLISTED);
        assert_eq!(result.analysis, reply);
        assert_eq!(result.candidate_id, fx.candidate.id);
        assert_eq!(result.job_id, fx.job.id);
        assert_eq!(fx.backend.call_count(), 1);

        let stored = fx.store.get_candidate(&fx.candidate.id).await.unwrap().unwrap();
        assert_eq!(stored.match_score, 82.0);
        assert_eq!(stored.status, STATUS_SHORTLISTED);
        assert!(stored.last_evaluated.unwrap() >= before);
        assert_eq!(stored.name, fx.candidate.name);
        assert_eq!(stored.email, fx.candidate.email);
        assert_eq!(stored.skills, fx.candidate.skills);
        assert_eq!(stored.resume_text, fx.candidate.resume_text);
    }

    #[tokio::test]
    async fn test_boundary_score_75_is_shortlisted() {
        let fx = fixture(ScriptedBackend::replying("Match percentage: 75")).await;
        let result = fx.evaluator.evaluate(&fx.candidate.id, &fx.job.id).await.unwrap();
        assert_eq!(result.status, STATUS_SHORTLISTED);
    }

    #[tokio::test]
    async fn test_score_below_threshold_is_under_review() {
        let fx = fixture(ScriptedBackend::replying("Match percentage: 74.9 overall")).await;
        let result = fx.evaluator.evaluate(&fx.candidate.id, &fx.job.id).await.unwrap();
        assert_eq!(result.match_score, 74.9);
        assert_eq!(result.status, STATUS_UNDER_REVIEW);
    }

    #[tokio::test]
    async fn test_unreadable_answer_degrades_to_sentinel_without_error() {
        for reply in ["I think this is a great fit!", "Match percentage: very high"] {
            let fx = fixture(ScriptedBackend::replying(reply)).await;

            let result = fx.evaluator.evaluate(&fx.candidate.id, &fx.job.id).await.unwrap();
            assert_eq!(result.match_score, 0.0);
            assert_eq!(result.status, STATUS_PROCESSING_ERROR);
            assert_eq!(result.analysis, reply);

            let stored = fx.store.get_candidate(&fx.candidate.id).await.unwrap().unwrap();
            assert_eq!(stored.status, STATUS_PROCESSING_ERROR);
            assert!(stored.last_evaluated.is_some());
        }
    }

    #[tokio::test]
    async fn test_missing_candidate_is_not_found_and_skips_inference() {
        let fx = fixture(ScriptedBackend::replying("Match percentage: 90")).await;

        let err = fx.evaluator.evaluate("no-such-candidate", &fx.job.id).await.unwrap_err();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "Candidate not found"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fx.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_job_is_not_found_and_skips_inference() {
        let fx = fixture(ScriptedBackend::replying("Match percentage: 90")).await;

        let err = fx.evaluator.evaluate(&fx.candidate.id, "no-such-job").await.unwrap_err();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "Job not found"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fx.backend.call_count(), 0);

        let stored = fx.store.get_candidate(&fx.candidate.id).await.unwrap().unwrap();
        assert!(stored.last_evaluated.is_none());
    }

    #[tokio::test]
    async fn test_backend_failure_is_an_error_not_the_sentinel() {
        let fx = fixture(ScriptedBackend::failing(503)).await;

        let err = fx.evaluator.evaluate(&fx.candidate.id, &fx.job.id).await.unwrap_err();
        assert!(matches!(err, AppError::Inference(_)));
        assert_eq!(fx.backend.call_count(), 1);

        let stored = fx.store.get_candidate(&fx.candidate.id).await.unwrap().unwrap();
        assert_eq!(stored.status, "New");
        assert!(stored.last_evaluated.is_none());
    }

    #[tokio::test]
    async fn test_prompt_sent_to_backend_describes_the_pair() {
        let fx = fixture(ScriptedBackend::replying("Match percentage: 50")).await;
        fx.evaluator.evaluate(&fx.candidate.id, &fx.job.id).await.unwrap();

        let prompts = fx.backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Required Skills: Rust, SQL"));
        assert!(prompts[0].contains("Candidate Skills: Rust, Go"));
        assert!(prompts[0].contains("Ten years of systems work"));
    }

    #[tokio::test]
    async fn test_re_evaluation_overwrites_previous_outcome() {
        let fx = fixture(ScriptedBackend::replying("Match percentage: 90")).await;
        fx.evaluator.evaluate(&fx.candidate.id, &fx.job.id).await.unwrap();

        let low = MatchEvaluator::new(
            fx.store.clone(),
            Arc::new(ScriptedBackend::replying("Match percentage: 30")),
            "mistral".to_string(),
        );
        low.evaluate(&fx.candidate.id, &fx.job.id).await.unwrap();

        let stored = fx.store.get_candidate(&fx.candidate.id).await.unwrap().unwrap();
        assert_eq!(stored.match_score, 30.0);
        assert_eq!(stored.status, STATUS_UNDER_REVIEW);
    }

    #[tokio::test]
    async fn test_concurrent_evaluations_both_complete_last_write_wins() {
        let fx = fixture(ScriptedBackend::replying("Match percentage: 88")).await;
        let other = MatchEvaluator::new(
            fx.store.clone(),
            Arc::new(ScriptedBackend::replying("Match percentage: 12")),
            "mistral".to_string(),
        );

        let (a, b) = tokio::join!(
            fx.evaluator.evaluate(&fx.candidate.id, &fx.job.id),
            other.evaluate(&fx.candidate.id, &fx.job.id),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        let stored = fx.store.get_candidate(&fx.candidate.id).await.unwrap().unwrap();
        assert!(
            stored.match_score == a.match_score || stored.match_score == b.match_score,
            "persisted score {} matches neither evaluation",
            stored.match_score
        );
        let expected_status = if stored.match_score == a.match_score {
            &a.status
        } else {
            &b.status
        };
        assert_eq!(&stored.status, expected_status);
    }

    /// Store that loses the candidate right after handing it out, mimicking a
    /// concurrent delete between the evaluator's read and its write.
    struct VanishingStore(SqliteStore);

    #[async_trait::async_trait]
    impl Store for VanishingStore {
        async fn create_job(&self, job: NewJob) -> Result<Job, AppError> {
            self.0.create_job(job).await
        }
        async fn list_jobs(&self) -> Result<Vec<Job>, AppError> {
            self.0.list_jobs().await
        }
        async fn get_job(&self, id: &str) -> Result<Option<Job>, AppError> {
            self.0.get_job(id).await
        }
        async fn create_candidate(&self, candidate: NewCandidate) -> Result<Candidate, AppError> {
            self.0.create_candidate(candidate).await
        }
        async fn list_candidates(&self) -> Result<Vec<Candidate>, AppError> {
            self.0.list_candidates().await
        }
        async fn get_candidate(&self, id: &str) -> Result<Option<Candidate>, AppError> {
            let candidate = self.0.get_candidate(id).await?;
            self.0.delete_candidate(id).await?;
            Ok(candidate)
        }
        async fn update_candidate(
            &self,
            id: &str,
            patch: CandidatePatch,
        ) -> Result<Option<Candidate>, AppError> {
            self.0.update_candidate(id, patch).await
        }
        async fn delete_candidate(&self, id: &str) -> Result<bool, AppError> {
            self.0.delete_candidate(id).await
        }
        async fn create_resume(&self, resume: NewResume) -> Result<Resume, AppError> {
            self.0.create_resume(resume).await
        }
        async fn list_resumes(&self) -> Result<Vec<Resume>, AppError> {
            self.0.list_resumes().await
        }
    }

    #[tokio::test]
    async fn test_candidate_deleted_mid_evaluation_still_returns_result() {
        let inner = memory_store().await;
        let job = inner.create_job(new_job(&["Rust"])).await.unwrap();
        let candidate = inner.create_candidate(new_candidate(&["Rust"], None)).await.unwrap();

        let store = Arc::new(VanishingStore(inner));
        let evaluator = MatchEvaluator::new(
            store.clone(),
            Arc::new(ScriptedBackend::replying("Match percentage: 77")),
            "mistral".to_string(),
        );

        let result = evaluator.evaluate(&candidate.id, &job.id).await.unwrap();
        assert_eq!(result.status, STATUS_SHORTLISTED);
        assert!(store.0.get_candidate(&candidate.id).await.unwrap().is_none());
    }

    #[test]
    fn test_timestamp_is_iso_8601_utc() {
        let at = DateTime::parse_from_rfc3339("2026-10-17T08:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(iso_timestamp(at), "2026-10-17T08:30:00.000000Z");
    }
}

pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::candidates::handlers as candidates;
use crate::email::handlers as email;
use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.upload_dir);
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/", get(health::home_handler))
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/jobs/",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/jobs/:id", get(jobs::handle_get_job))
        // Candidates
        .route(
            "/candidates/",
            get(candidates::handle_list_candidates).post(candidates::handle_create_candidate),
        )
        .route(
            "/candidates/:id",
            get(candidates::handle_get_candidate)
                .patch(candidates::handle_update_candidate)
                .delete(candidates::handle_delete_candidate),
        )
        // Resumes
        .route(
            "/resumes/",
            get(resumes::handle_list_resumes)
                .post(resumes::handle_upload_resume)
                .layer(upload_limit),
        )
        .nest_service("/uploads", uploads)
        // Matching
        .route(
            "/match/:candidate_id/:job_id",
            get(matching::handle_match),
        )
        // Email (stub)
        .route("/send-email/", post(email::handle_send_email))
        .with_state(state)
}

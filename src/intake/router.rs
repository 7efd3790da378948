use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, routing::post, Router};

use super::domain::{Candidate, CandidateSubmission};
use super::repository::CandidateStore;
use super::service::CandidateIntakeService;
use super::validator::SubmissionValidator;
use crate::error::AppError;

/// `POST /api/v1/candidates`: 201 with the stored candidate, or `{"error"}` with 400/409/500.
pub fn candidate_router<S, V>(service: Arc<CandidateIntakeService<S, V>>) -> Router
where
    S: CandidateStore + 'static,
    V: SubmissionValidator + 'static,
{
    Router::new()
        .route("/api/v1/candidates", post(add_candidate_handler::<S, V>))
        .with_state(service)
}

pub(crate) async fn add_candidate_handler<S, V>(
    State(service): State<Arc<CandidateIntakeService<S, V>>>,
    payload: Result<axum::Json<CandidateSubmission>, JsonRejection>,
) -> Result<(StatusCode, axum::Json<Candidate>), AppError>
where
    S: CandidateStore + 'static,
    V: SubmissionValidator + 'static,
{
    let axum::Json(submission) = payload?;
    let candidate = service.add_candidate(&submission).await?;
    Ok((StatusCode::CREATED, axum::Json(candidate)))
}

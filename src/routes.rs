use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json};
use serde_json::json;

use crate::infra::AppState;
use crate::intake::{
    candidate_router, CandidateIntakeService, CandidateStore, SubmissionValidator,
};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Candidate intake plus the health, readiness and Prometheus endpoints.
pub(crate) fn with_candidate_routes<S, V>(
    service: Arc<CandidateIntakeService<S, V>>,
) -> axum::Router
where
    S: CandidateStore + 'static,
    V: SubmissionValidator + 'static,
{
    candidate_router(service)
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn ready(Extension(state): Extension<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    if state.readiness.load(Ordering::Acquire) {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "starting" })),
        )
    }
}

async fn metrics(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let exposition = state.metrics.render();
    ([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], exposition)
}

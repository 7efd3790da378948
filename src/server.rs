use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use tokio::net::TcpListener;
use tracing::info;

use crate::cli::ServeArgs;
use crate::config::{AppConfig, IntakeConfig};
use crate::error::AppError;
use crate::infra::{AppState, InMemoryCandidateStore};
use crate::intake::{CandidateIntakeService, ValidationPolicy};
use crate::routes::with_candidate_routes;
use crate::telemetry;

pub(crate) async fn run(args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    config.server.host = args.host.unwrap_or(config.server.host);
    config.server.port = args.port.unwrap_or(config.server.port);

    telemetry::init(&config.telemetry)?;

    let ready = Arc::new(AtomicBool::new(false));
    let app = build_app(&config.intake, ready.clone());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    ready.store(true, Ordering::Release);
    info!(
        ?config.environment,
        %addr,
        max_entries = config.intake.max_entries,
        max_resume_bytes = config.intake.max_resume_bytes,
        "candidate intake listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Wire the in-memory store, intake service, operational routes and HTTP metrics.
fn build_app(limits: &IntakeConfig, ready: Arc<AtomicBool>) -> Router {
    let (metrics_layer, metrics_handle) = PrometheusMetricLayer::pair();
    let state = AppState {
        readiness: ready,
        metrics: Arc::new(metrics_handle),
    };

    let service = CandidateIntakeService::new(
        Arc::new(InMemoryCandidateStore::default()),
        ValidationPolicy::from(limits),
    );

    with_candidate_routes(Arc::new(service))
        .layer(Extension(state))
        .layer(metrics_layer)
}

// HTTP request handlers
use crate::application::scheduler::CycleReport;
use crate::presentation::app_state::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Last cycle's outcome, with the live outbox size
pub async fn cycle_status(State(state): State<Arc<AppState>>) -> Json<CycleReport> {
    let mut report = state.report.read().await.clone();
    report.pending = state.outbox.pending().await;
    Json(report)
}

// Application state for HTTP handlers
use crate::application::outbox::Outbox;
use crate::application::scheduler::CycleReport;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub report: Arc<RwLock<CycleReport>>,
    pub outbox: Arc<Outbox>,
}

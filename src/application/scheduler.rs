// Cycle scheduler - Runs evaluation cycles and flushes their events
use crate::application::evaluation_service::EvaluationService;
use crate::application::outbox::Outbox;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Outcome of the latest cycle, as exposed on the status endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CycleReport {
    pub finished_at: Option<String>,
    pub events: usize,
    pub ok: usize,
    pub warning: usize,
    pub critical: usize,
    pub pending: usize,
    pub last_error: Option<String>,
}

pub struct CycleScheduler {
    service: Arc<EvaluationService>,
    outbox: Arc<Outbox>,
    check_interval: Duration,
    report: Arc<RwLock<CycleReport>>,
}

impl CycleScheduler {
    pub fn new(service: Arc<EvaluationService>, outbox: Arc<Outbox>, check_interval: Duration) -> Self {
        Self {
            service,
            outbox,
            check_interval,
            report: Arc::new(RwLock::new(CycleReport::default())),
        }
    }

    pub fn report(&self) -> Arc<RwLock<CycleReport>> {
        self.report.clone()
    }

    /// Runs a cycle on every tick until the process is stopped. Cycles never
    /// overlap: a tick that fires while a cycle is still running is skipped.
    pub async fn run(&self) {
        tracing::info!(
            check_interval_secs = self.check_interval.as_secs(),
            "evaluation scheduler started"
        );

        let mut tick = interval(self.check_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tick.tick().await;
            // Errors are already logged and recorded in the report.
            let _ = self.run_once().await;
        }
    }

    /// Evaluates every board, queues the events and flushes the outbox.
    ///
    /// The outbox is flushed even when discovery failed so events held back by
    /// an earlier failed flush still get delivered.
    pub async fn run_once(&self) -> anyhow::Result<CycleReport> {
        let mut report = CycleReport::default();
        let mut first_error: Option<anyhow::Error> = None;

        match self.service.run_cycle().await {
            Ok(cycle) => {
                let counts = cycle.counts();
                tracing::info!(
                    ok = counts.ok,
                    warning = counts.warning,
                    critical = counts.critical,
                    "cycle produced {} event(s)",
                    cycle.len()
                );
                report.events = cycle.len();
                report.ok = counts.ok;
                report.warning = counts.warning;
                report.critical = counts.critical;
                self.outbox.enqueue(cycle).await;
            }
            Err(e) => {
                let e = anyhow::Error::from(e);
                tracing::error!("evaluation cycle failed: {:#}", e);
                first_error = Some(e);
            }
        }

        if let Err(e) = self.outbox.flush().await {
            let e = anyhow::Error::from(e);
            tracing::error!("{:#}", e);
            first_error.get_or_insert(e);
        }

        report.pending = self.outbox.pending().await;
        report.finished_at = Some(Utc::now().to_rfc3339());
        report.last_error = first_error.as_ref().map(|e| format!("{:#}", e));
        *self.report.write().await = report.clone();

        match first_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }
}

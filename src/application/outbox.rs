// Outbox - Events waiting to be pushed to the alerting queue
use crate::application::accumulator::{EvaluationAccumulator, StateCounts};
use crate::application::errors::EvaluationError;
use crate::application::repository::EventSink;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct Outbox {
    sink: Arc<dyn EventSink>,
    pending: Mutex<EvaluationAccumulator>,
}

impl Outbox {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            pending: Mutex::new(EvaluationAccumulator::new()),
        }
    }

    pub async fn enqueue(&self, events: EvaluationAccumulator) {
        self.pending.lock().await.merge(events);
    }

    pub async fn pending(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Pushes everything pending. The outbox is only emptied once the sink
    /// accepted the batch, so a failed flush is retried together with the
    /// next cycle's events.
    pub async fn flush(&self) -> Result<StateCounts, EvaluationError> {
        let mut pending = self.pending.lock().await;
        if pending.is_empty() {
            return Ok(StateCounts::default());
        }

        let counts = pending.counts();
        tracing::info!(
            ok = counts.ok,
            warning = counts.warning,
            critical = counts.critical,
            "sending {} event(s)",
            counts.total()
        );

        self.sink
            .push(pending.events())
            .await
            .map_err(|source| EvaluationError::Flush {
                count: pending.len(),
                source,
            })?;

        pending.clear();
        Ok(counts)
    }
}

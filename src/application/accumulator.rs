// Events and per-state counters collected during evaluation
use crate::domain::event::{CheckState, Event};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub ok: usize,
    pub warning: usize,
    pub critical: usize,
}

impl StateCounts {
    pub fn total(&self) -> usize {
        self.ok + self.warning + self.critical
    }
}

/// Every recorded event bumps exactly one counter, so the counts always add
/// up to the number of events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationAccumulator {
    events: Vec<Event>,
    counts: StateCounts,
}

impl EvaluationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: Event) {
        match event.state {
            CheckState::Ok => self.counts.ok += 1,
            CheckState::Warning => self.counts.warning += 1,
            CheckState::Critical => self.counts.critical += 1,
        }
        self.events.push(event);
    }

    pub fn merge(&mut self, other: EvaluationAccumulator) {
        self.counts.ok += other.counts.ok;
        self.counts.warning += other.counts.warning;
        self.counts.critical += other.counts.critical;
        self.events.extend(other.events);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn counts(&self) -> StateCounts {
        self.counts
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.counts = StateCounts::default();
    }
}

// Workload Domain Model

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Workload identifier (caller-assigned, unique within a run)
pub type WorkloadId = u64;

/// A simulated unit of work: an id and a burst length in abstract units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkloadDescriptor {
    pub id: WorkloadId,
    pub duration_units: u64,
}

impl WorkloadDescriptor {
    pub fn new(id: WorkloadId, duration_units: u64) -> Self {
        Self { id, duration_units }
    }

    /// Real wait time of this burst for a given unit length (saturating)
    pub fn burst(&self, unit: Duration) -> Duration {
        let units = u32::try_from(self.duration_units).unwrap_or(u32::MAX);
        unit.saturating_mul(units)
    }
}

/// How a single workload unit ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkloadOutcome {
    /// Slept for its full burst
    Completed { elapsed_ms: u64 },
    /// Woken early by a cancellation; remaining work abandoned
    Interrupted { elapsed_ms: u64 },
    /// The unit panicked; siblings were unaffected
    Failed { reason: String },
}

impl WorkloadOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, WorkloadOutcome::Completed { .. })
    }
}

impl std::fmt::Display for WorkloadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkloadOutcome::Completed { .. } => write!(f, "COMPLETED"),
            WorkloadOutcome::Interrupted { .. } => write!(f, "INTERRUPTED"),
            WorkloadOutcome::Failed { .. } => write!(f, "FAILED"),
        }
    }
}

/// Result row for one descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadResult {
    pub descriptor: WorkloadDescriptor,
    pub outcome: WorkloadOutcome,
}

/// Results of a full runner pass, in descriptor order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub results: Vec<WorkloadResult>,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_completed()).count()
    }

    pub fn interrupted(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, WorkloadOutcome::Interrupted { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, WorkloadOutcome::Failed { .. }))
            .count()
    }

    pub fn outcome_of(&self, id: WorkloadId) -> Option<&WorkloadOutcome> {
        self.results
            .iter()
            .find(|r| r.descriptor.id == id)
            .map(|r| &r.outcome)
    }
}

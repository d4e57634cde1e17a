// Progress Port
// Observability side channel: events are reported, never relied on for correctness

use crate::domain::WorkloadId;
use serde::Serialize;
use tracing::{error, info, warn};

/// Simulation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Workloads,
    ProducerConsumer,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Workloads => write!(f, "Process Threads"),
            Phase::ProducerConsumer => write!(f, "Producer-Consumer Simulation"),
        }
    }
}

/// Progress event emitted by workload units and channel roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    PhaseStarted { phase: Phase },
    PhaseFinished { phase: Phase },

    WorkloadStarted { id: WorkloadId },
    WorkloadFinished { id: WorkloadId, elapsed_ms: u64 },
    WorkloadInterrupted { id: WorkloadId, elapsed_ms: u64 },
    WorkloadFailed { id: WorkloadId, reason: String },

    AboutToProduce { role: String, item: i64 },
    Produced { role: String, item: i64, len: usize },
    AboutToConsume { role: String },
    Consumed { role: String, item: i64, len: usize },
    RoleInterrupted { role: String, handled: usize },
    RoleFinished { role: String, handled: usize },
}

/// Progress sink interface
///
/// Implementations:
/// - TracingProgress: structured log lines
/// - console sink in the CLI: human-readable progress lines
/// - mocks::RecordingProgress: captures events for assertions
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Reports every event through `tracing`
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::PhaseStarted { phase } => info!(%phase, "Phase started"),
            ProgressEvent::PhaseFinished { phase } => info!(%phase, "Phase finished"),
            ProgressEvent::WorkloadStarted { id } => info!(workload_id = id, "Workload started"),
            ProgressEvent::WorkloadFinished { id, elapsed_ms } => {
                info!(workload_id = id, elapsed_ms, "Workload finished")
            }
            ProgressEvent::WorkloadInterrupted { id, elapsed_ms } => {
                warn!(workload_id = id, elapsed_ms, "Workload interrupted during burst")
            }
            ProgressEvent::WorkloadFailed { id, reason } => {
                error!(workload_id = id, reason = %reason, "Workload failed")
            }
            ProgressEvent::AboutToProduce { role, item } => {
                info!(role = %role, item, "Waiting to produce")
            }
            ProgressEvent::Produced { role, item, len } => {
                info!(role = %role, item, len, "Produced")
            }
            ProgressEvent::AboutToConsume { role } => info!(role = %role, "Waiting to consume"),
            ProgressEvent::Consumed { role, item, len } => {
                info!(role = %role, item, len, "Consumed")
            }
            ProgressEvent::RoleInterrupted { role, handled } => {
                warn!(role = %role, handled, "Role interrupted, finishing early")
            }
            ProgressEvent::RoleFinished { role, handled } => {
                info!(role = %role, handled, "Role finished")
            }
        }
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Records every event in emission order
    #[derive(Default)]
    pub struct RecordingProgress {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl RecordingProgress {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<ProgressEvent> {
            self.events
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone()
        }

        /// Ids that reported a normal finish, in report order
        pub fn finished_ids(&self) -> Vec<WorkloadId> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    ProgressEvent::WorkloadFinished { id, .. } => Some(id),
                    _ => None,
                })
                .collect()
        }

        pub fn started_ids(&self) -> Vec<WorkloadId> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    ProgressEvent::WorkloadStarted { id } => Some(id),
                    _ => None,
                })
                .collect()
        }
    }

    impl ProgressSink for RecordingProgress {
        fn emit(&self, event: ProgressEvent) {
            self.events
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(event);
        }
    }
}

// Workload Runner - concurrent simulated bursts with join semantics

mod panic_guard;

pub use panic_guard::{join_failure_reason, panic_message};

use crate::application::cancel::{cancel_pair, CancelHandle, CancelToken};
use crate::domain::{RunReport, WorkloadDescriptor, WorkloadId, WorkloadOutcome, WorkloadResult};
use crate::port::{BurstExecutor, ProgressEvent, ProgressSink};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info};

/// Runs every descriptor as an independent task and waits for all of them
pub struct WorkloadRunner {
    burst: Arc<dyn BurstExecutor>,
    progress: Arc<dyn ProgressSink>,
}

impl WorkloadRunner {
    pub fn new(burst: Arc<dyn BurstExecutor>, progress: Arc<dyn ProgressSink>) -> Self {
        Self { burst, progress }
    }

    /// Run all descriptors concurrently; returns once every unit has ended
    ///
    /// `run_cancel` interrupts every unit still in its burst. A unit that is interrupted
    /// or panics never affects its siblings.
    pub async fn run_all(
        &self,
        descriptors: &[WorkloadDescriptor],
        run_cancel: &CancelToken,
    ) -> RunReport {
        self.spawn_all(descriptors, run_cancel).join().await
    }

    /// Start one task per descriptor and hand back per-unit handles
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn_all(
        &self,
        descriptors: &[WorkloadDescriptor],
        run_cancel: &CancelToken,
    ) -> RunningWorkloads {
        info!(count = descriptors.len(), "Starting workloads");

        let units = descriptors
            .iter()
            .map(|descriptor| {
                let (cancel, own_token) = cancel_pair();
                let handle = tokio::spawn(run_unit(
                    *descriptor,
                    Arc::clone(&self.burst),
                    Arc::clone(&self.progress),
                    own_token,
                    run_cancel.clone(),
                ));
                RunningUnit {
                    descriptor: *descriptor,
                    cancel,
                    handle,
                }
            })
            .collect();

        RunningWorkloads {
            units,
            progress: Arc::clone(&self.progress),
        }
    }
}

struct RunningUnit {
    descriptor: WorkloadDescriptor,
    cancel: CancelHandle,
    handle: JoinHandle<WorkloadOutcome>,
}

/// Workload units in flight
pub struct RunningWorkloads {
    units: Vec<RunningUnit>,
    progress: Arc<dyn ProgressSink>,
}

impl RunningWorkloads {
    pub fn ids(&self) -> Vec<WorkloadId> {
        self.units.iter().map(|u| u.descriptor.id).collect()
    }

    /// Interrupt exactly one unit; returns false for an unknown id
    pub fn interrupt(&self, id: WorkloadId) -> bool {
        match self.units.iter().find(|u| u.descriptor.id == id) {
            Some(unit) => {
                unit.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Barrier: wait for every unit and collect outcomes in descriptor order
    pub async fn join(self) -> RunReport {
        let mut results = Vec::with_capacity(self.units.len());

        for unit in self.units {
            let id = unit.descriptor.id;
            let outcome = match unit.handle.await {
                Ok(outcome) => outcome,
                Err(join_err) => {
                    let reason = join_failure_reason(join_err);
                    error!(workload_id = id, reason = %reason, "Workload unit failed");
                    self.progress.emit(ProgressEvent::WorkloadFailed {
                        id,
                        reason: reason.clone(),
                    });
                    WorkloadOutcome::Failed { reason }
                }
            };
            results.push(WorkloadResult {
                descriptor: unit.descriptor,
                outcome,
            });
        }

        let report = RunReport { results };
        info!(
            completed = report.completed(),
            interrupted = report.interrupted(),
            failed = report.failed(),
            "All workloads joined"
        );
        report
    }
}

async fn run_unit(
    descriptor: WorkloadDescriptor,
    burst: Arc<dyn BurstExecutor>,
    progress: Arc<dyn ProgressSink>,
    own_cancel: CancelToken,
    run_cancel: CancelToken,
) -> WorkloadOutcome {
    let id = descriptor.id;
    progress.emit(ProgressEvent::WorkloadStarted { id });
    let started = Instant::now();

    let interrupted = tokio::select! {
        biased;
        _ = own_cancel.cancelled() => true,
        _ = run_cancel.cancelled() => true,
        _ = burst.execute(&descriptor) => false,
    };

    let elapsed_ms = millis(started.elapsed());
    if interrupted {
        progress.emit(ProgressEvent::WorkloadInterrupted { id, elapsed_ms });
        WorkloadOutcome::Interrupted { elapsed_ms }
    } else {
        progress.emit(ProgressEvent::WorkloadFinished { id, elapsed_ms });
        WorkloadOutcome::Completed { elapsed_ms }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

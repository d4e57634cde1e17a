//! Human-readable progress lines on stdout

use colored::Colorize;
use simsync_core::port::{Phase, ProgressEvent, ProgressSink};

/// Prints one line per progress event
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn emit(&self, event: ProgressEvent) {
        if let Some(line) = render(&event) {
            println!("{line}");
        }
    }
}

/// Text for one event; `None` for events that print nothing
pub fn render(event: &ProgressEvent) -> Option<String> {
    let line = match event {
        ProgressEvent::PhaseStarted {
            phase: Phase::Workloads,
        } => format!("=== Starting {} ===", Phase::Workloads),
        ProgressEvent::PhaseStarted { phase } => format!("\n=== Starting {phase} ==="),
        ProgressEvent::PhaseFinished { .. } | ProgressEvent::RoleFinished { .. } => return None,

        ProgressEvent::WorkloadStarted { id } => format!("Process {id} started."),
        ProgressEvent::WorkloadFinished { id, .. } => format!("Process {id} finished."),
        ProgressEvent::WorkloadInterrupted { id, elapsed_ms } => format!(
            "{}\nProcess {id} finished.",
            format!("Process {id} interrupted after {elapsed_ms}ms.").yellow()
        ),
        ProgressEvent::WorkloadFailed { id, reason } => {
            format!("Process {id} failed: {reason}").red().to_string()
        }

        ProgressEvent::AboutToProduce { role, item } => {
            format!("[{role}] Waiting for lock to produce {item}")
        }
        ProgressEvent::Produced { role, item, .. } => {
            format!("[{role}] Acquired lock and produced: {item}")
        }
        ProgressEvent::AboutToConsume { role } => {
            format!("[{role}] Waiting for lock to consume...")
        }
        ProgressEvent::Consumed { role, item, .. } => {
            format!("[{role}] Acquired lock and consumed: {item}")
        }
        ProgressEvent::RoleInterrupted { role, handled } => {
            format!("[{role}] Interrupted after {handled} items.")
                .yellow()
                .to_string()
        }
    };
    Some(line)
}

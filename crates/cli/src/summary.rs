//! End-of-run summary

use colored::Colorize;
use simsync_core::application::SimulationReport;
use simsync_core::domain::{WorkloadOutcome, WorkloadResult};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct WorkloadRow {
    #[tabled(rename = "PID")]
    id: u64,
    #[tabled(rename = "Burst")]
    burst: u64,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Elapsed")]
    elapsed: String,
}

impl From<&WorkloadResult> for WorkloadRow {
    fn from(result: &WorkloadResult) -> Self {
        let elapsed = match &result.outcome {
            WorkloadOutcome::Completed { elapsed_ms }
            | WorkloadOutcome::Interrupted { elapsed_ms } => format!("{elapsed_ms}ms"),
            WorkloadOutcome::Failed { reason } => reason.clone(),
        };
        Self {
            id: result.descriptor.id,
            burst: result.descriptor.duration_units,
            outcome: result.outcome.to_string(),
            elapsed,
        }
    }
}

/// Print the workload table and channel figures
pub fn print_summary(report: &SimulationReport) {
    println!();
    println!("{}", "Summary".cyan().bold());

    if report.workloads.results.is_empty() {
        println!("  {}", "No workloads were run".yellow());
    } else {
        let rows: Vec<WorkloadRow> = report
            .workloads
            .results
            .iter()
            .map(WorkloadRow::from)
            .collect();
        println!("{}", Table::new(rows));
    }

    let stats = &report.channel;
    println!();
    println!("  {} {}", "Capacity:".bold(), stats.capacity);
    println!("  {} {} / {}", "Sent / Received:".bold(), stats.sent, stats.received);
    println!("  {} {}", "High water:".bold(), stats.high_water);
    println!(
        "  {} {} (full) / {} (empty)",
        "Blocked waits:".bold(),
        stats.send_waits,
        stats.receive_waits
    );

    for role in [&report.producer, &report.consumer] {
        let status = if role.interrupted {
            "INTERRUPTED".yellow()
        } else {
            "DONE".green()
        };
        println!("  {} {} ({} items)", format!("{}:", role.role).bold(), status, role.handled());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simsync_core::domain::WorkloadDescriptor;

    #[test]
    fn test_row_from_result() {
        let completed = WorkloadRow::from(&WorkloadResult {
            descriptor: WorkloadDescriptor::new(2, 1),
            outcome: WorkloadOutcome::Completed { elapsed_ms: 100 },
        });
        assert_eq!(completed.id, 2);
        assert_eq!(completed.burst, 1);
        assert_eq!(completed.outcome, "COMPLETED");
        assert_eq!(completed.elapsed, "100ms");

        let failed = WorkloadRow::from(&WorkloadResult {
            descriptor: WorkloadDescriptor::new(5, 4),
            outcome: WorkloadOutcome::Failed {
                reason: "boom".to_string(),
            },
        });
        assert_eq!(failed.outcome, "FAILED");
        assert_eq!(failed.elapsed, "boom");
    }
}

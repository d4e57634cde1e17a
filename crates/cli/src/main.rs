//! Simsync - Main Entry Point
//! Runs the workload phase, then the producer/consumer phase

mod console;
mod logging;
mod summary;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use logging::LogFormat;
use simsync_core::application::constants::{
    DEFAULT_BURST_UNIT, DEFAULT_CHANNEL_CAPACITY, DEFAULT_ITEM_COUNT, DEFAULT_MAX_PAUSE,
};
use simsync_core::application::{cancel_pair, load_descriptors, Simulation, SimulationConfig};
use simsync_core::port::{ProgressSink, TracingProgress};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_INPUT: &str = "processes.txt";

#[derive(Parser, Debug)]
#[command(name = "simsync")]
#[command(about = "Concurrent workload and bounded-buffer simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Workload file: `<pid> <burst>` per line, optional `PID ...` header
    #[arg(short, long, env = "SIMSYNC_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Milliseconds of simulated work per burst unit
    #[arg(
        long,
        env = "SIMSYNC_BURST_UNIT_MS",
        default_value_t = DEFAULT_BURST_UNIT.as_millis() as u64
    )]
    burst_unit_ms: u64,

    /// Producer/consumer buffer capacity (at least 1)
    #[arg(short, long, env = "SIMSYNC_CAPACITY", default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    capacity: usize,

    /// Items handed from producer to consumer
    #[arg(short = 'n', long, env = "SIMSYNC_ITEMS", default_value_t = DEFAULT_ITEM_COUNT)]
    items: usize,

    /// Upper bound of the random pause between operations, in milliseconds
    #[arg(
        long,
        env = "SIMSYNC_MAX_PAUSE_MS",
        default_value_t = DEFAULT_MAX_PAUSE.as_millis() as u64
    )]
    max_pause_ms: u64,

    /// Abort when the workload file cannot be loaded (default: continue with no workloads)
    #[arg(long, env = "SIMSYNC_STRICT")]
    strict: bool,

    /// Print the final report as JSON instead of progress lines and a table
    #[arg(long)]
    json: bool,

    /// Log format on stderr
    #[arg(long, env = "SIMSYNC_LOG_FORMAT", value_enum, default_value = "pretty")]
    log_format: LogFormat,

    /// Also write JSON logs to this file
    #[arg(long, env = "SIMSYNC_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            burst_unit: Duration::from_millis(self.burst_unit_ms),
            capacity: self.capacity,
            items: self.items,
            max_pause: Duration::from_millis(self.max_pause_ms),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    let _log_guard = logging::init_logging(cli.log_format, cli.log_file.as_deref())?;
    info!("Simsync v{} starting...", simsync_core::VERSION);

    // 2. Validate configuration
    let config = cli.simulation_config();
    config.validate().context("Invalid configuration")?;

    // 3. Load workloads (caller decides how to recover)
    let descriptors = match load_descriptors(&cli.input) {
        Ok(descriptors) => descriptors,
        Err(e) if cli.strict => {
            return Err(e).with_context(|| format!("Failed to load {}", cli.input.display()));
        }
        Err(e) => {
            warn!(error = %e, "Could not load workloads, continuing without them");
            eprintln!("{} {}", "Error reading file:".red(), e);
            Vec::new()
        }
    };

    // 4. Setup dependencies (DI wiring)
    let progress: Arc<dyn ProgressSink> = if cli.json {
        Arc::new(TracingProgress)
    } else {
        Arc::new(console::ConsoleProgress)
    };
    let simulation = Simulation::new(config, progress);

    // 5. Ctrl+C interrupts whatever is currently waiting
    let (cancel_handle, cancel_token) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping units at their next wait");
            cancel_handle.cancel();
        }
    });

    // 6. Run both phases
    let report = simulation.run(&descriptors, &cancel_token).await?;

    // 7. Present
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("=== Simulation Complete ===");
        summary::print_summary(&report);
    }

    info!("Shutdown complete.");
    Ok(())
}

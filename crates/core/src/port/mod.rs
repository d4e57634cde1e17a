// Port Layer - Interfaces for injectable collaborators

pub mod burst;
pub mod pacer; // For deterministic testing
pub mod progress;

// Re-exports
pub use burst::{BurstExecutor, SleepBurst};
pub use pacer::{FixedPacer, NoPacer, Pacer, RandomPacer};
pub use progress::{Phase, ProgressEvent, ProgressSink, TracingProgress};

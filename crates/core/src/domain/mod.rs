// Domain Layer - Pure simulation entities

pub mod queue;
pub mod workload;

// Re-exports
pub use queue::{ChannelState, ChannelStats};
pub use workload::{RunReport, WorkloadDescriptor, WorkloadId, WorkloadOutcome, WorkloadResult};

// Application Layer - Use Cases and Concurrency Primitives

pub mod cancel;
pub mod channel;
pub mod constants;
pub mod loader;
pub mod roles;
pub mod runner;
pub mod simulation;

// Re-exports
pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use channel::{BoundedChannel, ChannelError};
pub use loader::{load_descriptors, parse_descriptors, LoadError};
pub use roles::{Consumer, Producer, RoleReport};
pub use runner::{RunningWorkloads, WorkloadRunner};
pub use simulation::{Simulation, SimulationConfig, SimulationReport};

// Burst Executor Port
// Abstraction for the simulated CPU burst of a workload unit

use crate::domain::WorkloadDescriptor;
use async_trait::async_trait;
use std::time::Duration;

/// Burst Executor trait
///
/// Implementations:
/// - SleepBurst: suspends for `duration_units × unit`
/// - mocks::MockBurst: scripted behavior for tests
#[async_trait]
pub trait BurstExecutor: Send + Sync {
    /// Occupy the unit for its burst; cancellation is handled by the caller
    async fn execute(&self, descriptor: &WorkloadDescriptor);
}

/// Sleep-based burst (production)
pub struct SleepBurst {
    unit: Duration,
}

impl SleepBurst {
    pub fn new(unit: Duration) -> Self {
        Self { unit }
    }
}

#[async_trait]
impl BurstExecutor for SleepBurst {
    async fn execute(&self, descriptor: &WorkloadDescriptor) {
        tokio::time::sleep(descriptor.burst(self.unit)).await;
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::WorkloadId;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sleeps like SleepBurst, but panics for the listed ids
    pub struct MockBurst {
        unit: Duration,
        panic_ids: HashSet<WorkloadId>,
        call_count: AtomicUsize,
    }

    impl MockBurst {
        pub fn new(unit: Duration) -> Self {
            Self {
                unit,
                panic_ids: HashSet::new(),
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn panicking_on(unit: Duration, ids: impl IntoIterator<Item = WorkloadId>) -> Self {
            Self {
                panic_ids: ids.into_iter().collect(),
                ..Self::new(unit)
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BurstExecutor for MockBurst {
        async fn execute(&self, descriptor: &WorkloadDescriptor) {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if self.panic_ids.contains(&descriptor.id) {
                panic!("simulated burst failure for workload {}", descriptor.id);
            }
            tokio::time::sleep(descriptor.burst(self.unit)).await;
        }
    }
}

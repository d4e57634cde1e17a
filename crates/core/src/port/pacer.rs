// Pacer Port (for testability)

use rand::Rng;
use std::time::Duration;

/// Pause strategy between successive channel operations (allows deterministic tests)
pub trait Pacer: Send + Sync {
    /// Length of the next pause
    fn next_pause(&self) -> Duration;
}

/// Uniformly random pause in `[0, max)` (production)
pub struct RandomPacer {
    max: Duration,
}

impl RandomPacer {
    pub fn new(max: Duration) -> Self {
        Self { max }
    }
}

impl Pacer for RandomPacer {
    fn next_pause(&self) -> Duration {
        let max_ms = u64::try_from(self.max.as_millis()).unwrap_or(u64::MAX);
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
    }
}

/// Constant pause
pub struct FixedPacer(pub Duration);

impl Pacer for FixedPacer {
    fn next_pause(&self) -> Duration {
        self.0
    }
}

/// No pause at all
pub struct NoPacer;

impl Pacer for NoPacer {
    fn next_pause(&self) -> Duration {
        Duration::ZERO
    }
}

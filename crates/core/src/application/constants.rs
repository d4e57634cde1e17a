// Simulation constants (No magic values)
use std::time::Duration;

/// Real wait time of one burst unit (100ms)
pub const DEFAULT_BURST_UNIT: Duration = Duration::from_millis(100);

/// Producer/consumer buffer capacity, smaller than the item count so both
/// blocking directions get exercised
pub const DEFAULT_CHANNEL_CAPACITY: usize = 5;

/// Items handed from producer to consumer per run
pub const DEFAULT_ITEM_COUNT: usize = 10;

/// Upper bound (exclusive) of the random pause between channel operations (300ms)
pub const DEFAULT_MAX_PAUSE: Duration = Duration::from_millis(300);

/// Name of the producer role in progress output
pub const PRODUCER_NAME: &str = "Producer 1";

/// Name of the consumer role in progress output
pub const CONSUMER_NAME: &str = "Consumer 1";

// Bounded Channel Domain Model

use serde::{Deserialize, Serialize};

/// Occupancy state of a bounded channel, derived solely from its length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelState {
    Empty,
    Partial,
    Full,
}

impl ChannelState {
    /// Classify a length against a capacity (capacity is always >= 1)
    pub fn classify(len: usize, capacity: usize) -> Self {
        if len == 0 {
            ChannelState::Empty
        } else if len >= capacity {
            ChannelState::Full
        } else {
            ChannelState::Partial
        }
    }
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelState::Empty => write!(f, "EMPTY"),
            ChannelState::Partial => write!(f, "PARTIAL"),
            ChannelState::Full => write!(f, "FULL"),
        }
    }
}

/// Point-in-time counters of a bounded channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub capacity: usize,
    pub sent: u64,
    pub received: u64,
    /// Sends that found the channel FULL and had to wait
    pub send_waits: u64,
    /// Receives that found the channel EMPTY and had to wait
    pub receive_waits: u64,
    /// Largest length ever stored
    pub high_water: usize,
    /// Some send left the channel FULL
    pub observed_full: bool,
    /// Some receive found the channel EMPTY (whether or not it then waited)
    pub observed_empty: bool,
}

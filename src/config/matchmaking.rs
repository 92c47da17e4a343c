//! Matchmaking configuration constants.
//!
//! This module defines the timing of the pairing queue.

/// Default time (in seconds) a connection may wait unpaired, when enabled.
pub const DEFAULT_QUEUE_TIMEOUT_SECS: u64 = 300;

/// Interval (in seconds) between sweeps of the pairing queue for expired entries.
pub const QUEUE_SWEEP_INTERVAL_SECS: u64 = 1;

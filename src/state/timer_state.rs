//! Timer session state structure

use serde::{Deserialize, Serialize};

/// Elapsed-time state for a rotation session
///
/// `elapsed_seconds` is the authoritative clock; the minute/second split
/// for display is derived from it. `offset_seconds` is a decorative dial
/// rotation that never feeds cycle counting or alarm timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Whether the per-second driver is currently advancing the clock
    pub running: bool,
    /// Whether a session has been started since the last reset
    pub started: bool,
    /// True seconds since session start
    pub elapsed_seconds: u64,
    /// Completed whole minutes of elapsed time
    pub cycles: u32,
    /// Dial rotation in seconds, in [0, 720); display only
    pub offset_seconds: u32,
}

impl TimerState {
    /// Create the zero-form state: stopped, nothing elapsed, no offset
    pub fn new() -> Self {
        Self {
            running: false,
            started: false,
            elapsed_seconds: 0,
            cycles: 0,
            offset_seconds: 0,
        }
    }

    /// Whole minutes of elapsed time
    pub fn minutes(&self) -> u64 {
        self.elapsed_seconds / 60
    }

    /// Seconds past the current whole minute
    pub fn seconds(&self) -> u64 {
        self.elapsed_seconds % 60
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

//! Derived clock-face projection
//!
//! The dial offset and the elapsed time are summed as a single continuous
//! second quantity, and only the result modulo the 60-minute dial face is
//! rendered. Cycle counting and alarm timing never read these values; they
//! always work on the untransformed elapsed time.

use serde::{Deserialize, Serialize};

/// Hand angles for the analog dial, in degrees clockwise from 12 o'clock
///
/// The dial carries 12 numerals, so the minute hand wraps every 12
/// display minutes and creeps forward with the seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandAngles {
    pub minute_deg: f64,
    pub second_deg: f64,
}

/// Project elapsed time plus decorative offset onto the dial
pub fn hand_angles(elapsed_seconds: u64, offset_seconds: u32) -> HandAngles {
    let total = elapsed_seconds + u64::from(offset_seconds);
    let display_seconds = total % 60;
    let display_minutes = (total / 60) % 60;
    HandAngles {
        minute_deg: (display_minutes % 12) as f64 * 30.0 + display_seconds as f64 / 2.0,
        second_deg: display_seconds as f64 * 6.0,
    }
}

/// Zero-padded MM:SS text for the elapsed-time readout
///
/// Minutes are not wrapped; a 62 minute session reads "62:01".
pub fn format_elapsed(elapsed_seconds: u64) -> String {
    format!("{:02}:{:02}", elapsed_seconds / 60, elapsed_seconds % 60)
}

//! External collaborator module
//!
//! This module contains the audio playback collaborator that turns alarm
//! signals into sound outside the engine.

pub mod playback;

// Re-export main types
pub use playback::{check_player_available, AlarmPlayer};

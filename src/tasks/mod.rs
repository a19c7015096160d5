//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod alarm;
pub mod ticker;

// Re-export main functions
pub use alarm::alarm_playback_task;
pub use ticker::tick_driver_task;

//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod alarm_config;
pub mod engine;
pub mod timer_state;

// Re-export main types
pub use alarm_config::AlarmConfig;
pub use engine::{AlarmSignal, TimerEngine};
pub use timer_state::TimerState;

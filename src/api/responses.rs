//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    display::HandAngles,
    state::{AlarmConfig, TimerState},
};

/// API response structure for session control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create an ok response
    pub fn ok(message: String, timer: TimerState) -> Self {
        Self::new("ok".to_string(), message, timer)
    }

    /// Create an error response
    pub fn error(message: String, timer: TimerState) -> Self {
        Self::new("error".to_string(), message, timer)
    }
}

/// Settings update payload from the configuration surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsRequest {
    pub enabled: bool,
    pub interval_minutes: u32,
}

/// Settings update response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub alarm: AlarmConfig,
}

impl SettingsResponse {
    /// Create an ok response
    pub fn ok(message: String, alarm: AlarmConfig) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            alarm,
        }
    }

    /// Create an error response carrying the unchanged configuration
    pub fn error(message: String, alarm: AlarmConfig) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
            alarm,
        }
    }
}

/// Display projection block embedded in the status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayBlock {
    /// Zero-padded MM:SS elapsed-time readout
    pub elapsed: String,
    /// Dial hand angles including the decorative offset
    pub hands: HandAngles,
}

/// Enhanced status response with timer, settings and display projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    pub alarm: AlarmConfig,
    pub display: DisplayBlock,
    pub alarm_playing: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: "1.1.0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_responses_carry_status_and_timer() {
        let ok = ApiResponse::ok("Session started".to_string(), TimerState::new());
        assert_eq!(ok.status, "ok");
        let err = ApiResponse::error("nope".to_string(), TimerState::new());
        assert_eq!(err.status, "error");
    }

    #[test]
    fn health_response_serializes() {
        let value = serde_json::to_value(HealthResponse::ok()).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["version"], "1.1.0");
    }
}

//! Alarm configuration structure

use serde::{Deserialize, Serialize};

/// Interval-alarm configuration, owned by the settings surface
///
/// The engine only reads this; mutation goes through
/// [`TimerEngine::set_alarm_config`](super::TimerEngine::set_alarm_config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmConfig {
    /// Whether the interval alarm fires at all
    pub enabled: bool,
    /// Minutes between alarms, valid range 1..=60
    pub interval_minutes: u32,
}

impl AlarmConfig {
    pub const MIN_INTERVAL_MINUTES: u32 = 1;
    pub const MAX_INTERVAL_MINUTES: u32 = 60;

    /// Create a validated configuration
    pub fn new(enabled: bool, interval_minutes: u32) -> Result<Self, String> {
        if !(Self::MIN_INTERVAL_MINUTES..=Self::MAX_INTERVAL_MINUTES).contains(&interval_minutes) {
            return Err(format!(
                "Invalid alarm interval: {} (expected {}..={} minutes)",
                interval_minutes,
                Self::MIN_INTERVAL_MINUTES,
                Self::MAX_INTERVAL_MINUTES
            ));
        }
        Ok(Self {
            enabled,
            interval_minutes,
        })
    }

    /// Disabled configuration with the default 12 minute rotation interval
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            interval_minutes: 12,
        }
    }
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_interval_within_bounds() {
        assert_eq!(
            AlarmConfig::new(true, 1),
            Ok(AlarmConfig {
                enabled: true,
                interval_minutes: 1
            })
        );
        assert_eq!(
            AlarmConfig::new(false, 60),
            Ok(AlarmConfig {
                enabled: false,
                interval_minutes: 60
            })
        );
    }

    #[test]
    fn rejects_interval_outside_bounds() {
        assert!(AlarmConfig::new(true, 0).is_err());
        assert!(AlarmConfig::new(true, 61).is_err());
    }

    #[test]
    fn default_is_disabled_with_twelve_minute_interval() {
        let config = AlarmConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.interval_minutes, 12);
    }
}

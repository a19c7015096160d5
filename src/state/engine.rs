//! Timer engine: session state ownership and suspend-gap reconciliation

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::schedule;

use super::{AlarmConfig, TimerState};

/// Transient "fire the alarm now" event, sent on the alarm channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmSignal {
    /// The elapsed-minute boundary that triggered the signal
    pub minute_count: u64,
}

/// Timer engine that owns the session state and drives alarm decisions
///
/// There is exactly one state pair (timer state + alarm config) and all
/// mutation goes through the operations below. Every mutation notifies
/// the timer watch channel so the tick driver and any other observer see
/// fresh state; alarm boundaries fan out on a broadcast channel.
#[derive(Debug)]
pub struct TimerEngine {
    /// Authoritative session state
    timer_state: Arc<Mutex<TimerState>>,
    /// Alarm configuration, mutated only through the settings operation
    alarm_config: Arc<Mutex<AlarmConfig>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Arc<Mutex<Option<String>>>,
    last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for timer state updates
    timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    _timer_update_rx: watch::Receiver<TimerState>,
    /// Channel for alarm signals
    alarm_tx: broadcast::Sender<AlarmSignal>,
}

impl TimerEngine {
    /// Create a new engine in the zero form with the given alarm config
    pub fn new(port: u16, host: String, alarm_config: AlarmConfig) -> Self {
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerState::new());
        let (alarm_tx, _) = broadcast::channel(100);

        Self {
            timer_state: Arc::new(Mutex::new(TimerState::new())),
            alarm_config: Arc::new(Mutex::new(alarm_config)),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
            alarm_tx,
        }
    }

    /// Apply a user-action mutation, record the action and notify watchers
    fn update_state<F>(&self, action: &str, updater: F) -> Result<TimerState, String>
    where
        F: FnOnce(&mut TimerState),
    {
        let mut state = self
            .timer_state
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        updater(&mut state);
        let new_state = state.clone();
        drop(state);

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.notify_timer_update(new_state.clone());
        Ok(new_state)
    }

    fn notify_timer_update(&self, new_state: TimerState) {
        if let Err(e) = self.timer_update_tx.send(new_state) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    /// Emit an alarm signal to all subscribers
    fn fire_alarm(&self, minute_count: u64) {
        info!("Alarm boundary reached at minute {}", minute_count);
        if let Err(e) = self.alarm_tx.send(AlarmSignal { minute_count }) {
            debug!("No alarm subscribers: {}", e);
        }
    }

    /// Start a new session from zero elapsed time
    ///
    /// A randomized start rotates the dial by a random minute in [0, 12)
    /// plus a random second in [0, 60); the rotation is display only.
    /// Calling this while already running restarts the session.
    pub fn start(&self, randomized: bool) -> Result<TimerState, String> {
        let offset_seconds = if randomized { random_offset_seconds() } else { 0 };
        info!(
            "Starting session (randomized: {}, offset: {}s)",
            randomized, offset_seconds
        );
        self.update_state(if randomized { "start-random" } else { "start" }, |state| {
            state.elapsed_seconds = 0;
            state.cycles = 0;
            state.offset_seconds = offset_seconds;
            state.started = true;
            state.running = true;
        })
    }

    /// Suspend the per-second driver without losing session state
    pub fn pause(&self) -> Result<TimerState, String> {
        info!("Pausing session");
        self.update_state("pause", |state| state.running = false)
    }

    /// Resume a previously started session
    ///
    /// Ignored until a session has been started.
    pub fn resume(&self) -> Result<TimerState, String> {
        info!("Resuming session");
        self.update_state("resume", |state| {
            if state.started {
                state.running = true;
            } else {
                warn!("Ignoring resume before any session was started");
            }
        })
    }

    /// Return the clock to its zero form
    ///
    /// Does not stop in-flight alarm playback; stopping the alarm is a
    /// separate explicit action.
    pub fn reset(&self) -> Result<TimerState, String> {
        info!("Resetting session");
        self.update_state("reset", |state| *state = TimerState::new())
    }

    /// Advance the clock by one second
    ///
    /// Called once per elapsed real second by the driver while the
    /// session is running. Crossing a minute boundary increments the
    /// cycle count and may fire the interval alarm.
    pub fn tick(&self) -> Result<TimerState, String> {
        let config = self.get_alarm_config()?;

        let mut state = self
            .timer_state
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        if !state.running {
            debug!("Ignoring tick while the clock is not running");
            return Ok(state.clone());
        }

        state.elapsed_seconds += 1;
        let mut fired = None;
        if state.elapsed_seconds % 60 == 0 {
            state.cycles = state.cycles.saturating_add(1);
            let minute_count = state.minutes();
            if config.enabled && schedule::crosses_boundary(minute_count, config.interval_minutes) {
                fired = Some(minute_count);
            }
        }
        let new_state = state.clone();
        drop(state);

        self.notify_timer_update(new_state.clone());
        if let Some(minute_count) = fired {
            self.fire_alarm(minute_count);
        }
        Ok(new_state)
    }

    /// Fold a suspend gap into the clock
    ///
    /// Called once with the number of real seconds that elapsed while
    /// per-second updates were not delivered. Produces the same
    /// `elapsed_seconds` and `cycles` as that many sequential ticks, but
    /// fires at most ONE alarm no matter how many interval boundaries
    /// fell inside the gap, so a long suspension cannot flood the user
    /// with catch-up alarms. Ignored while the clock is not running.
    pub fn reconcile(&self, gap_seconds: u64) -> Result<TimerState, String> {
        let config = self.get_alarm_config()?;

        let mut state = self
            .timer_state
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        if !state.running {
            debug!("Ignoring reconcile while the clock is not running");
            return Ok(state.clone());
        }
        if gap_seconds == 0 {
            return Ok(state.clone());
        }

        let old_minutes = state.minutes();
        state.elapsed_seconds += gap_seconds;
        let new_minutes = state.minutes();

        let minutes_passed = new_minutes - old_minutes;
        if minutes_passed > 0 {
            state.cycles = state
                .cycles
                .saturating_add(minutes_passed.min(u64::from(u32::MAX)) as u32);
        }

        let mut fired = None;
        if config.enabled {
            fired = schedule::first_boundary_crossed(old_minutes, new_minutes, config.interval_minutes);
        }
        let new_state = state.clone();
        drop(state);

        info!(
            "Reconciled {}s suspend gap: now {}s elapsed, {} cycles",
            gap_seconds, new_state.elapsed_seconds, new_state.cycles
        );
        self.notify_timer_update(new_state.clone());
        if let Some(minute_count) = fired {
            self.fire_alarm(minute_count);
        }
        Ok(new_state)
    }

    /// Replace the alarm configuration from the settings surface
    pub fn set_alarm_config(&self, enabled: bool, interval_minutes: u32) -> Result<AlarmConfig, String> {
        let new_config = AlarmConfig::new(enabled, interval_minutes)?;

        let mut config = self
            .alarm_config
            .lock()
            .map_err(|e| format!("Failed to lock alarm config: {}", e))?;
        *config = new_config;
        drop(config);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some("settings".to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        info!(
            "Alarm configuration updated: enabled={}, interval={}min",
            enabled, interval_minutes
        );
        Ok(new_config)
    }

    /// Get a snapshot of the current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.timer_state
            .lock()
            .map(|state| state.clone())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Get the current alarm configuration
    pub fn get_alarm_config(&self) -> Result<AlarmConfig, String> {
        self.alarm_config
            .lock()
            .map(|config| *config)
            .map_err(|e| format!("Failed to lock alarm config: {}", e))
    }

    /// Subscribe to timer state updates
    pub fn subscribe_timer(&self) -> watch::Receiver<TimerState> {
        self.timer_update_tx.subscribe()
    }

    /// Subscribe to alarm signals
    pub fn subscribe_alarms(&self) -> broadcast::Receiver<AlarmSignal> {
        self.alarm_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

/// Random dial rotation: a minute in [0, 12) plus a second in [0, 60)
fn random_offset_seconds() -> u32 {
    let mut rng = rand::rng();
    rng.random_range(0..12u32) * 60 + rng.random_range(0..60u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(enabled: bool, interval_minutes: u32) -> TimerEngine {
        TimerEngine::new(
            0,
            "127.0.0.1".to_string(),
            AlarmConfig {
                enabled,
                interval_minutes,
            },
        )
    }

    fn drain_alarms(rx: &mut broadcast::Receiver<AlarmSignal>) -> Vec<AlarmSignal> {
        let mut signals = Vec::new();
        while let Ok(signal) = rx.try_recv() {
            signals.push(signal);
        }
        signals
    }

    #[test]
    fn start_zeroes_counters_and_runs() {
        let engine = engine_with(false, 12);
        let state = engine.start(false).unwrap();
        assert!(state.running);
        assert!(state.started);
        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.cycles, 0);
        assert_eq!(state.offset_seconds, 0);
    }

    #[test]
    fn randomized_start_offsets_within_dial_range() {
        let engine = engine_with(false, 12);
        for _ in 0..50 {
            let state = engine.start(true).unwrap();
            assert!(state.offset_seconds < 720);
            assert_eq!(state.elapsed_seconds, 0);
            assert_eq!(state.cycles, 0);
        }
    }

    #[test]
    fn restart_while_running_clears_previous_session() {
        let engine = engine_with(false, 12);
        engine.start(true).unwrap();
        for _ in 0..75 {
            engine.tick().unwrap();
        }
        let state = engine.start(false).unwrap();
        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.cycles, 0);
        assert_eq!(state.offset_seconds, 0);
        assert!(state.running);
    }

    #[test]
    fn ticks_accumulate_seconds_and_cycles() {
        let engine = engine_with(false, 12);
        engine.start(false).unwrap();
        for _ in 0..130 {
            engine.tick().unwrap();
        }
        let state = engine.get_timer_state().unwrap();
        assert_eq!(state.elapsed_seconds, 130);
        assert_eq!(state.cycles, 2);
    }

    #[test]
    fn live_ticking_fires_once_per_boundary() {
        let engine = engine_with(true, 1);
        let mut alarms = engine.subscribe_alarms();
        engine.start(false).unwrap();
        for _ in 0..120 {
            engine.tick().unwrap();
        }
        let signals = drain_alarms(&mut alarms);
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].minute_count, 1);
        assert_eq!(signals[1].minute_count, 2);
    }

    #[test]
    fn twelve_minute_interval_fires_exactly_once_over_twelve_minutes() {
        let engine = engine_with(true, 12);
        let mut alarms = engine.subscribe_alarms();
        engine.start(false).unwrap();
        for _ in 0..720 {
            engine.tick().unwrap();
        }
        let state = engine.get_timer_state().unwrap();
        assert_eq!(state.elapsed_seconds, 720);
        assert_eq!(state.cycles, 12);
        let signals = drain_alarms(&mut alarms);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].minute_count, 12);
    }

    #[test]
    fn tick_while_paused_is_ignored() {
        let engine = engine_with(false, 12);
        engine.start(false).unwrap();
        for _ in 0..5 {
            engine.tick().unwrap();
        }
        engine.pause().unwrap();
        let state = engine.tick().unwrap();
        assert_eq!(state.elapsed_seconds, 5);
        assert!(!state.running);
        assert!(state.started);
    }

    #[test]
    fn pause_and_resume_preserve_counters() {
        let engine = engine_with(false, 12);
        engine.start(true).unwrap();
        for _ in 0..5 {
            engine.tick().unwrap();
        }
        let paused = engine.pause().unwrap();
        let resumed = engine.resume().unwrap();
        assert!(resumed.running);
        assert_eq!(resumed.elapsed_seconds, paused.elapsed_seconds);
        assert_eq!(resumed.cycles, paused.cycles);
        assert_eq!(resumed.offset_seconds, paused.offset_seconds);
    }

    #[test]
    fn resume_before_start_is_ignored() {
        let engine = engine_with(false, 12);
        let state = engine.resume().unwrap();
        assert!(!state.running);
        assert!(!state.started);
    }

    #[test]
    fn reset_returns_exact_zero_form() {
        let engine = engine_with(true, 12);
        engine.start(true).unwrap();
        for _ in 0..90 {
            engine.tick().unwrap();
        }
        let state = engine.reset().unwrap();
        assert_eq!(state, TimerState::new());
    }

    #[test]
    fn reconcile_matches_sequential_ticks() {
        for gap in [0u64, 1, 59, 60, 61, 119, 600, 3599, 86_400] {
            let reconciled = engine_with(false, 12);
            let ticked = engine_with(false, 12);
            reconciled.start(false).unwrap();
            ticked.start(false).unwrap();

            // Advance both to the same mid-minute starting point first
            for _ in 0..130 {
                reconciled.tick().unwrap();
                ticked.tick().unwrap();
            }

            reconciled.reconcile(gap).unwrap();
            for _ in 0..gap {
                ticked.tick().unwrap();
            }

            let a = reconciled.get_timer_state().unwrap();
            let b = ticked.get_timer_state().unwrap();
            assert_eq!(a.elapsed_seconds, b.elapsed_seconds, "gap {}", gap);
            assert_eq!(a.cycles, b.cycles, "gap {}", gap);
        }
    }

    #[test]
    fn reconcile_collapses_missed_boundaries_to_one_alarm() {
        // 25 minutes at a 12 minute interval crosses minutes 12 and 24
        let engine = engine_with(true, 12);
        let mut alarms = engine.subscribe_alarms();
        engine.start(false).unwrap();
        let state = engine.reconcile(1500).unwrap();
        assert_eq!(state.elapsed_seconds, 1500);
        assert_eq!(state.cycles, 25);
        let signals = drain_alarms(&mut alarms);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].minute_count, 12);
    }

    #[test]
    fn reconcile_with_alarm_disabled_never_fires() {
        let engine = engine_with(false, 12);
        let mut alarms = engine.subscribe_alarms();
        engine.start(false).unwrap();
        engine.reconcile(100_000).unwrap();
        assert!(drain_alarms(&mut alarms).is_empty());
    }

    #[test]
    fn reconcile_while_not_running_is_ignored() {
        let engine = engine_with(true, 12);
        let state = engine.reconcile(500).unwrap();
        assert_eq!(state, TimerState::new());

        engine.start(false).unwrap();
        engine.pause().unwrap();
        let state = engine.reconcile(500).unwrap();
        assert_eq!(state.elapsed_seconds, 0);
    }

    #[test]
    fn reconcile_zero_gap_changes_nothing() {
        let engine = engine_with(true, 12);
        let mut alarms = engine.subscribe_alarms();
        engine.start(false).unwrap();
        let state = engine.reconcile(0).unwrap();
        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.cycles, 0);
        assert!(drain_alarms(&mut alarms).is_empty());
    }

    #[test]
    fn dial_offset_never_shifts_alarm_timing() {
        // Randomized sessions must fire exactly like plain ones
        for _ in 0..20 {
            let engine = engine_with(true, 2);
            let mut alarms = engine.subscribe_alarms();
            engine.start(true).unwrap();
            for _ in 0..120 {
                engine.tick().unwrap();
            }
            let state = engine.get_timer_state().unwrap();
            assert_eq!(state.cycles, 2);
            let signals = drain_alarms(&mut alarms);
            assert_eq!(signals.len(), 1);
            assert_eq!(signals[0].minute_count, 2);
        }
    }

    #[test]
    fn settings_update_validates_interval() {
        let engine = engine_with(false, 12);
        assert!(engine.set_alarm_config(true, 0).is_err());
        assert!(engine.set_alarm_config(true, 61).is_err());
        let config = engine.set_alarm_config(true, 30).unwrap();
        assert!(config.enabled);
        assert_eq!(config.interval_minutes, 30);
        assert_eq!(engine.get_alarm_config().unwrap(), config);
    }

    #[test]
    fn actions_are_recorded() {
        let engine = engine_with(false, 12);
        engine.start(false).unwrap();
        let (action, time) = engine.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());

        engine.pause().unwrap();
        let (action, _) = engine.get_last_action();
        assert_eq!(action.as_deref(), Some("pause"));
    }

    #[test]
    fn watch_channel_tracks_mutations() {
        let engine = engine_with(false, 12);
        let rx = engine.subscribe_timer();
        engine.start(false).unwrap();
        engine.tick().unwrap();
        assert_eq!(rx.borrow().elapsed_seconds, 1);
        assert!(rx.borrow().running);
    }
}

//! One-second driver with suspend-gap reconciliation

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::state::TimerEngine;

/// Wall-clock delta at or above which an interval firing is treated as a
/// suspend gap instead of an ordinary tick
const SUSPEND_GAP_MILLIS: i64 = 2500;

/// Background task that advances the clock once per second while running
///
/// The driver is parked on the timer watch channel whenever the session
/// is not running, so a paused or reset clock receives no ticks at all.
/// While running, each interval firing measures the wall-clock delta
/// since the previous one: about one second means a normal tick, while a
/// larger delta means the process was suspended (laptop sleep, SIGSTOP,
/// VM pause) and the whole delta is folded in through `reconcile` before
/// any further tick is delivered.
pub async fn tick_driver_task(engine: Arc<TimerEngine>) {
    info!("Starting tick driver task");

    let mut timer_rx = engine.subscribe_timer();

    loop {
        // Park until a session is running
        if !timer_rx.borrow_and_update().running {
            if timer_rx.changed().await.is_err() {
                debug!("Timer channel closed, stopping tick driver");
                return;
            }
            continue;
        }

        debug!("Session running, driving one-second ticks");
        let mut ticker = interval(Duration::from_secs(1));
        // Suspension must not burst-deliver the missed ticks; the gap is
        // measured against the wall clock instead.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first firing completes immediately and only sets the baseline
        ticker.tick().await;
        let mut last_wall = Utc::now();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Utc::now();
                    let delta_millis = (now - last_wall).num_milliseconds();
                    last_wall = now;

                    let result = if delta_millis < 0 {
                        warn!("Wall clock went backwards ({}ms), skipping tick", delta_millis);
                        continue;
                    } else if delta_millis < SUSPEND_GAP_MILLIS {
                        engine.tick()
                    } else {
                        let gap_seconds = ((delta_millis + 500) / 1000) as u64;
                        info!("Detected {}s suspend gap, reconciling", gap_seconds);
                        engine.reconcile(gap_seconds)
                    };

                    if let Err(e) = result {
                        warn!("Failed to advance clock: {}", e);
                    }
                }
                changed = timer_rx.changed() => {
                    if changed.is_err() {
                        debug!("Timer channel closed, stopping tick driver");
                        return;
                    }
                    if !timer_rx.borrow_and_update().running {
                        info!("Session paused or reset, suspending tick driver");
                        break;
                    }
                }
            }
        }
    }
}

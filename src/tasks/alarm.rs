//! Alarm playback background task

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::{services::AlarmPlayer, state::TimerEngine};

/// Background task that turns alarm signals into audible playback
pub async fn alarm_playback_task(engine: Arc<TimerEngine>, player: Arc<AlarmPlayer>) {
    info!("Starting alarm playback task");

    let mut alarm_rx = engine.subscribe_alarms();

    loop {
        match alarm_rx.recv().await {
            Ok(signal) => {
                info!("Playing alarm for minute boundary {}", signal.minute_count);
                if let Err(e) = player.play().await {
                    error!("Alarm playback failed: {}", e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Alarm playback lagged, {} signals dropped", skipped);
            }
            Err(RecvError::Closed) => {
                debug!("Alarm channel closed, stopping playback task");
                return;
            }
        }
    }
}

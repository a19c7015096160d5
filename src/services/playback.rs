//! External alarm playback collaborator
//!
//! The engine never touches audio resources; it only emits alarm signals.
//! This wrapper spawns the configured player command per signal and can
//! kill it again for an explicit stop.

use tokio::{
    process::{Child, Command},
    sync::Mutex,
};
use tracing::{debug, info, warn};

/// Handle to the external audio player used for the interval alarm
#[derive(Debug)]
pub struct AlarmPlayer {
    command: String,
    sound_path: String,
    child: Mutex<Option<Child>>,
}

impl AlarmPlayer {
    /// Create a player around an external command and sound file
    pub fn new(command: String, sound_path: String) -> Self {
        Self {
            command,
            sound_path,
            child: Mutex::new(None),
        }
    }

    /// Start alarm playback, replacing any playback still in flight
    pub async fn play(&self) -> Result<(), String> {
        debug!("Spawning alarm playback: {} {}", self.command, self.sound_path);

        let mut slot = self.child.lock().await;
        if let Some(mut previous) = slot.take() {
            match previous.try_wait() {
                Ok(Some(_)) => debug!("Previous alarm playback had already finished"),
                _ => {
                    if let Err(e) = previous.kill().await {
                        warn!("Failed to stop previous alarm playback: {}", e);
                    }
                }
            }
        }

        let child = Command::new(&self.command)
            .arg(&self.sound_path)
            .spawn()
            .map_err(|e| format!("Failed to spawn {}: {}", self.command, e))?;
        *slot = Some(child);

        info!("Alarm playback started");
        Ok(())
    }

    /// Stop in-flight alarm playback, if any
    pub async fn stop(&self) -> Result<(), String> {
        let mut slot = self.child.lock().await;
        match slot.take() {
            Some(mut child) => {
                match child.try_wait() {
                    Ok(Some(_)) => debug!("Alarm playback had already finished"),
                    _ => {
                        child
                            .kill()
                            .await
                            .map_err(|e| format!("Failed to stop alarm playback: {}", e))?;
                        info!("Alarm playback stopped");
                    }
                }
                Ok(())
            }
            None => {
                debug!("No alarm playback to stop");
                Ok(())
            }
        }
    }

    /// Whether the alarm sound is still playing
    pub async fn is_playing(&self) -> bool {
        let mut slot = self.child.lock().await;
        match slot.as_mut() {
            Some(child) => match child.try_wait() {
                Ok(Some(_)) => {
                    *slot = None;
                    false
                }
                Ok(None) => true,
                Err(e) => {
                    warn!("Failed to poll alarm playback: {}", e);
                    *slot = None;
                    false
                }
            },
            None => false,
        }
    }
}

/// Check that the configured player command can be invoked
pub async fn check_player_available(command: &str) -> Result<(), String> {
    Command::new(command)
        .arg("--version")
        .output()
        .await
        .map_err(|_| format!("{} is not available; alarms will be silent", command))?;

    info!("Alarm player '{}' is available", command);
    Ok(())
}

//! Sauna Bell - A state-managed elapsed-time clock server with periodic
//! rotation alarms
//!
//! This is the main entry point for the sauna-bell application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use sauna_bell::{
    api::create_router,
    config::Config,
    services::{check_player_available, AlarmPlayer},
    state::{AlarmConfig, TimerEngine},
    tasks::{alarm_playback_task, tick_driver_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("sauna_bell={},tower_http=info", config.log_level()))
        .init();

    info!("Starting sauna-bell server v1.1.0");
    info!(
        "Configuration: host={}, port={}, interval={}min, alarm={}",
        config.host, config.port, config.interval, config.alarm
    );

    // A missing player leaves the clock fully functional, just silent
    if let Err(e) = check_player_available(&config.alarm_command).await {
        warn!("{}", e);
    }

    // Create the engine and the playback collaborator
    let alarm_config =
        AlarmConfig::new(config.alarm, config.interval).map_err(|e| anyhow::anyhow!(e))?;
    let engine = Arc::new(TimerEngine::new(
        config.port,
        config.host.clone(),
        alarm_config,
    ));
    let player = Arc::new(AlarmPlayer::new(
        config.alarm_command.clone(),
        config.alarm_sound.clone(),
    ));

    // Start the background tasks
    let driver_engine = Arc::clone(&engine);
    tokio::spawn(async move {
        tick_driver_task(driver_engine).await;
    });

    let playback_engine = Arc::clone(&engine);
    let playback_player = Arc::clone(&player);
    tokio::spawn(async move {
        alarm_playback_task(playback_engine, playback_player).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(engine, player);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start        - Start a session");
    info!("  POST /start-random - Start a session with a random dial offset");
    info!("  POST /pause        - Pause the running session");
    info!("  POST /resume       - Resume a paused session");
    info!("  POST /reset        - Reset the clock to zero");
    info!("  POST /alarm/stop   - Stop in-flight alarm playback");
    info!("  PUT  /settings     - Update alarm interval and toggle");
    info!("  GET  /status       - Current timer, settings and display state");
    info!("  GET  /health       - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

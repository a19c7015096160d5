//! HTTP endpoint handlers

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, info, warn};

use crate::display;

use super::responses::{
    ApiResponse, DisplayBlock, HealthResponse, SettingsRequest, SettingsResponse, StatusResponse,
};
use super::ApiContext;

/// Handle POST /start - Start a session from zero elapsed time
pub async fn start_handler(State(ctx): State<ApiContext>) -> Result<Json<ApiResponse>, StatusCode> {
    match ctx.engine.start(false) {
        Ok(timer) => {
            info!("Start endpoint called - session started");
            Ok(Json(ApiResponse::ok("Session started".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to start session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start-random - Start a session with a random dial offset
pub async fn start_random_handler(
    State(ctx): State<ApiContext>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match ctx.engine.start(true) {
        Ok(timer) => {
            info!("Start-random endpoint called - session started");
            Ok(Json(ApiResponse::ok(
                format!("Session started with {}s dial offset", timer.offset_seconds),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to start randomized session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Pause the running session
pub async fn pause_handler(State(ctx): State<ApiContext>) -> Result<Json<ApiResponse>, StatusCode> {
    match ctx.engine.pause() {
        Ok(timer) => {
            info!("Pause endpoint called - session paused");
            Ok(Json(ApiResponse::ok("Session paused".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to pause session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /resume - Resume a paused session
pub async fn resume_handler(State(ctx): State<ApiContext>) -> Result<Json<ApiResponse>, StatusCode> {
    match ctx.engine.resume() {
        Ok(timer) => {
            if timer.running {
                info!("Resume endpoint called - session resumed");
                Ok(Json(ApiResponse::ok("Session resumed".to_string(), timer)))
            } else {
                warn!("Resume endpoint called before any session was started");
                Ok(Json(ApiResponse::error(
                    "No session to resume".to_string(),
                    timer,
                )))
            }
        }
        Err(e) => {
            error!("Failed to resume session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Return the clock to its zero form
pub async fn reset_handler(State(ctx): State<ApiContext>) -> Result<Json<ApiResponse>, StatusCode> {
    match ctx.engine.reset() {
        Ok(timer) => {
            info!("Reset endpoint called - clock reset");
            Ok(Json(ApiResponse::ok("Clock reset".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to reset clock: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /alarm/stop - Stop in-flight alarm playback
pub async fn alarm_stop_handler(
    State(ctx): State<ApiContext>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let timer = match ctx.engine.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match ctx.player.stop().await {
        Ok(()) => {
            info!("Alarm-stop endpoint called - playback stopped");
            Ok(Json(ApiResponse::ok("Alarm stopped".to_string(), timer)))
        }
        Err(e) => {
            warn!("Failed to stop alarm playback: {}", e);
            Ok(Json(ApiResponse::error(
                format!("Failed to stop alarm: {}", e),
                timer,
            )))
        }
    }
}

/// Handle PUT /settings - Update the alarm configuration
pub async fn settings_handler(
    State(ctx): State<ApiContext>,
    Json(request): Json<SettingsRequest>,
) -> Result<Json<SettingsResponse>, StatusCode> {
    match ctx
        .engine
        .set_alarm_config(request.enabled, request.interval_minutes)
    {
        Ok(alarm) => {
            info!("Settings endpoint called - alarm configuration updated");
            Ok(Json(SettingsResponse::ok(
                "Alarm configuration updated".to_string(),
                alarm,
            )))
        }
        Err(e) => {
            warn!("Rejected settings update: {}", e);
            match ctx.engine.get_alarm_config() {
                Ok(alarm) => Ok(Json(SettingsResponse::error(e, alarm))),
                Err(e) => {
                    error!("Failed to get alarm config: {}", e);
                    Err(StatusCode::INTERNAL_SERVER_ERROR)
                }
            }
        }
    }
}

/// Handle GET /status - Return current timer, settings and display state
pub async fn status_handler(
    State(ctx): State<ApiContext>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match ctx.engine.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let alarm = match ctx.engine.get_alarm_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get alarm config: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let display = DisplayBlock {
        elapsed: display::format_elapsed(timer.elapsed_seconds),
        hands: display::hand_angles(timer.elapsed_seconds, timer.offset_seconds),
    };

    let (last_action, last_action_time) = ctx.engine.get_last_action();

    Ok(Json(StatusResponse {
        alarm_playing: ctx.player.is_playing().await,
        uptime: ctx.engine.get_uptime(),
        port: ctx.engine.port,
        host: ctx.engine.host.clone(),
        timer,
        alarm,
        display,
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

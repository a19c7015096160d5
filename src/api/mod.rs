//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{services::AlarmPlayer, state::TimerEngine};
use handlers::*;

/// Shared handler context: the engine plus the playback collaborator
#[derive(Debug, Clone)]
pub struct ApiContext {
    pub engine: Arc<TimerEngine>,
    pub player: Arc<AlarmPlayer>,
}

/// Create the HTTP router with all endpoints
pub fn create_router(engine: Arc<TimerEngine>, player: Arc<AlarmPlayer>) -> Router {
    let context = ApiContext { engine, player };

    Router::new()
        .route("/start", post(start_handler))
        .route("/start-random", post(start_random_handler))
        .route("/pause", post(pause_handler))
        .route("/resume", post(resume_handler))
        .route("/reset", post(reset_handler))
        .route("/alarm/stop", post(alarm_stop_handler))
        .route("/settings", put(settings_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

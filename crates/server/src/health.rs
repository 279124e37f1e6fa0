//! Liveness endpoint

use api_types::health::{DatabaseHealth, DatabaseStatus, Health};
use axum::{Json, extract::State};
use chrono::Utc;

use crate::server::ServerState;

/// Report liveness and whether the store answers a ping.
pub async fn health(State(state): State<ServerState>) -> Json<Health> {
    let status = match state.engine.ping().await {
        Ok(()) => DatabaseStatus::Connected,
        Err(err) => {
            tracing::warn!("database ping failed: {err}");
            DatabaseStatus::Disconnected
        }
    };

    Json(Health {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database: DatabaseHealth { status },
    })
}

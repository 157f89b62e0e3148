use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub version: String,
    pub gemini_configured: bool,
    pub model: Option<String>,
    pub uptime_seconds: u64,
    pub timestamp: String,
}

/// Liveness message
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "MediLens API is running" }))
}

/// Current service status
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        service: "medilens",
        version: env!("CARGO_PKG_VERSION").to_string(),
        gemini_configured: state.gemini.is_some(),
        model: state.gemini.as_ref().map(|g| g.model().to_string()),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

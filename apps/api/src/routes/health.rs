use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and store reachability.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let store_ok = match state.records.store().health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!("Store health check failed: {e}");
            false
        }
    };

    let status = if store_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "service": "recruiter",
        "model": state.config.openai_model,
    }))
}

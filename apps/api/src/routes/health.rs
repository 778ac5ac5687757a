use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::db::ping;
use crate::state::AppState;

/// GET /health
/// Reports the service version and whether PostgreSQL answers. Always 200 so
/// a slow database does not take the instance out of rotation.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let database = ping(&state.db).await;
    Json(json!({
        "status": if database { "ok" } else { "degraded" },
        "database": database,
        "version": env!("CARGO_PKG_VERSION"),
        "service": "careers-api"
    }))
}

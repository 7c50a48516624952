use axum::Json;
use serde_json::json;

/// GET /health
///
/// Liveness probe. Reports the gateway's own status only -- the upstream
/// asset service is deliberately not contacted here.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

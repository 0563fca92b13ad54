use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;

/// GET /health: liveness probe, reports whether the transport is usable.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "transport": state.transport.name(),
        "connected": state.transport.is_connected().await,
        "poll_interval_ms": state.config.scheduler.poll_interval_ms,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::http::test_support::{get, test_app, StubTransport};

    #[tokio::test]
    async fn health_reports_transport_state() {
        let app = test_app(StubTransport::offline());
        let (status, body) = get(&app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["transport"], "stub");
        assert_eq!(body["connected"], false);
        assert_eq!(body["poll_interval_ms"], 1000);
    }
}

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use courier_channels::Transport;
use courier_contacts::ContactResolver;
use courier_core::CourierConfig;
use courier_scheduler::JobStore;

/// Central shared state, passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: CourierConfig,
    /// Same store the scheduler engine polls; handlers only insert and read.
    pub store: JobStore,
    pub resolver: ContactResolver,
    pub transport: Arc<dyn Transport>,
}

impl AppState {
    pub fn new(config: CourierConfig, store: JobStore, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            store,
            resolver: ContactResolver::new(Arc::clone(&transport)),
            transport,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let schedule = post(crate::http::schedule::schedule_handler)
        .options(crate::http::schedule::preflight_handler);

    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/schedule", schedule.clone())
        // Path used by the browser extension.
        .route("/api/schedule", schedule)
        .route("/contacts", get(crate::http::contacts::contacts_handler))
        .route("/jobs", get(crate::http::jobs::jobs_handler))
        .with_state(state)
        .layer(middleware::map_response(allow_any_origin))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

async fn allow_any_origin(mut res: Response) -> Response {
    res.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    res
}

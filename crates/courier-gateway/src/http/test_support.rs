//! Shared fixtures for the HTTP handler tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use courier_channels::{Contact, ContactSnapshot, Transport, TransportError};
use courier_core::CourierConfig;
use courier_scheduler::JobStore;
use serde_json::Value;
use tower::ServiceExt;

use crate::app::{build_router, AppState};

/// Transport with a fixed address book. Offline stubs refuse snapshots.
pub(crate) struct StubTransport {
    connected: bool,
    contacts: Vec<(String, String)>,
}

impl StubTransport {
    pub(crate) fn with_contacts(contacts: &[(&str, &str)]) -> Self {
        Self {
            connected: true,
            contacts: contacts
                .iter()
                .map(|(a, n)| (a.to_string(), n.to_string()))
                .collect(),
        }
    }

    pub(crate) fn offline() -> Self {
        Self {
            connected: false,
            contacts: Vec::new(),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    fn name(&self) -> &str {
        "stub"
    }

    async fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send(&self, _address: &str, _text: &str) -> Result<String, TransportError> {
        Ok("sent".to_string())
    }

    async fn snapshot_contacts(&self) -> Result<ContactSnapshot, TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        Ok(self
            .contacts
            .iter()
            .map(|(address, display_name)| {
                (
                    address.clone(),
                    Contact {
                        address: address.clone(),
                        display_name: display_name.clone(),
                    },
                )
            })
            .collect())
    }
}

pub(crate) struct TestApp {
    pub router: Router,
    pub store: JobStore,
    _dir: Option<tempfile::TempDir>,
}

pub(crate) fn test_app(transport: StubTransport) -> TestApp {
    let store = JobStore::open_in_memory().unwrap();
    TestApp {
        router: router_for(store.clone(), transport),
        store,
        _dir: None,
    }
}

/// App whose backing table has been dropped behind the store's back, so
/// every write fails.
pub(crate) fn broken_store_app(transport: StubTransport) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("courier.db");
    let store = JobStore::open(&path).unwrap();
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch("DROP TABLE scheduled_messages;")
        .unwrap();
    TestApp {
        router: router_for(store.clone(), transport),
        store,
        _dir: Some(dir),
    }
}

fn router_for(store: JobStore, transport: StubTransport) -> Router {
    let state = AppState::new(CourierConfig::default(), store, Arc::new(transport));
    build_router(Arc::new(state))
}

pub(crate) async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

pub(crate) async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app, req).await;
    (status, serde_json::from_str(&body).unwrap_or(Value::Null))
}

pub(crate) async fn post_json(app: &TestApp, uri: &str, body: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, _, body) = send(app, req).await;
    (status, body)
}

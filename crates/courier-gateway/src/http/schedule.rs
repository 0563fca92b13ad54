//! Intake endpoint: POST /schedule (alias POST /api/schedule).
//!
//! A request moves through validation, destination resolution and
//! persistence; the first failing step decides the response:
//!
//! | Step      | Failure                         | Status |
//! |-----------|---------------------------------|--------|
//! | validate  | bad JSON / time / missing field | 400    |
//! | resolve   | name matches no contact         | 404    |
//! | resolve   | contact list unavailable        | 500    |
//! | persist   | store write failed              | 500    |
//!
//! Delivery happens later in the scheduler loop; send failures never reach
//! the HTTP caller.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use courier_channels::address;
use courier_scheduler::types::is_storable;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::error::IntakeError;
use crate::app::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// Raw routable address. Wins over `name` when both are set.
    #[serde(default)]
    pub destination: Option<String>,
    /// Contact display name to resolve.
    #[serde(default, alias = "recipient")]
    pub name: Option<String>,
    #[serde(default)]
    pub message: String,
    /// RFC 3339 date-time with an explicit offset.
    #[serde(default, alias = "send_time")]
    pub send_time: String,
}

/// Where a validated request should be delivered.
#[derive(Debug, PartialEq, Eq)]
enum Target {
    Direct(String),
    ByName(String),
}

#[derive(Debug)]
struct ValidRequest {
    target: Target,
    message: String,
    send_at: DateTime<Utc>,
}

/// POST /schedule
pub async fn schedule_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, IntakeError> {
    let req: ScheduleRequest = serde_json::from_slice(&body)
        .map_err(|e| IntakeError::Validation(format!("Bad request: {e}")))?;
    let valid = validate(req)?;

    let destination = match valid.target {
        Target::Direct(dest) => dest,
        Target::ByName(name) => {
            let resolved = state
                .resolver
                .resolve_first(&name)
                .await?
                .ok_or_else(|| IntakeError::NotFound("Contact not found".to_string()))?;
            address::user_part(&resolved).to_string()
        }
    };

    let id = state
        .store
        .insert(&destination, &valid.message, valid.send_at)?;
    info!(job_id = id, %destination, send_at = %valid.send_at, "message scheduled");

    Ok(Json(json!({ "success": true })))
}

/// OPTIONS /schedule: CORS pre-flight for browser callers.
pub async fn preflight_handler() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (header::ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
    )
}

fn validate(req: ScheduleRequest) -> Result<ValidRequest, IntakeError> {
    let send_at = DateTime::parse_from_rfc3339(req.send_time.trim())
        .map_err(|_| {
            IntakeError::Validation(
                "Invalid time format: expected RFC 3339 date-time with offset".to_string(),
            )
        })?
        .with_timezone(&Utc);
    if !is_storable(send_at) {
        return Err(IntakeError::Validation(
            "Invalid time: must fall between years 0001 and 9999 UTC".to_string(),
        ));
    }

    if req.message.trim().is_empty() {
        return Err(IntakeError::Validation("Message is required".to_string()));
    }

    let destination = non_blank(req.destination);
    let name = non_blank(req.name);
    let target = match (destination, name) {
        (Some(dest), _) => {
            if !address::is_routable(&dest) {
                return Err(IntakeError::Validation(format!(
                    "Invalid destination: {dest:?}"
                )));
            }
            Target::Direct(dest)
        }
        (None, Some(name)) => Target::ByName(name),
        (None, None) => {
            return Err(IntakeError::Validation(
                "Either destination or name is required".to_string(),
            ))
        }
    };

    Ok(ValidRequest {
        target,
        message: req.message,
        send_at,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use courier_contacts::LookupError;
use courier_scheduler::SchedulerError;
use thiserror::Error;
use tracing::{error, warn};

/// Everything that can short-circuit an intake request.
///
/// Rendered as a plain-text body with the matching status code.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] SchedulerError),

    #[error("contact lookup failed: {0}")]
    LookupUnavailable(#[from] LookupError),
}

impl IntakeError {
    pub fn status(&self) -> StatusCode {
        match self {
            IntakeError::Validation(_) => StatusCode::BAD_REQUEST,
            IntakeError::NotFound(_) => StatusCode::NOT_FOUND,
            IntakeError::Storage(_) | IntakeError::LookupUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            IntakeError::Validation(msg) | IntakeError::NotFound(msg) => {
                warn!(status = status.as_u16(), reason = %msg, "request rejected");
                msg.clone()
            }
            IntakeError::Storage(e) => {
                error!(error = %e, "store failure while handling request");
                "Storage error".to_string()
            }
            IntakeError::LookupUnavailable(e) => {
                error!(error = %e, "contact lookup unavailable");
                "Contact lookup unavailable".to_string()
            }
        };
        (status, body).into_response()
    }
}

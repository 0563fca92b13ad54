use thiserror::Error;

/// Errors reported by a messaging transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The account session is not connected; nothing can be sent or listed.
    #[error("Transport not connected")]
    NotConnected,

    /// The destination cannot be routed by this transport.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The transport reported that the message was not delivered.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// The bridge could not be reached or returned an HTTP error status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The bridge answered with a non-success HTTP status.
    #[error("Bridge API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The bridge answered with a body we could not interpret.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}


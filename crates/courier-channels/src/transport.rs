use async_trait::async_trait;

use crate::{error::TransportError, types::ContactSnapshot};

/// Contract of the outbound messaging collaborator.
///
/// Implementations must be `Send + Sync` so a single instance can be shared
/// (behind an `Arc`) by the scheduler loop and the HTTP handlers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Stable lowercase identifier used in logs (e.g. `"bridge"`).
    fn name(&self) -> &str;

    /// Whether the underlying account session is currently usable.
    async fn is_connected(&self) -> bool;

    /// Deliver `text` to `address`.
    ///
    /// Returns the transport's status detail on success. A send the transport
    /// reports as unsuccessful is `Err(TransportError::SendFailed(detail))`.
    async fn send(&self, address: &str, text: &str) -> Result<String, TransportError>;

    /// Current address book, keyed by address.
    async fn snapshot_contacts(&self) -> Result<ContactSnapshot, TransportError>;
}

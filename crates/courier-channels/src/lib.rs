//! `courier-channels`: the outbound messaging collaborator.
//!
//! The scheduler and the contact resolver only ever see the [`Transport`]
//! trait. [`BridgeTransport`] is the production implementation: it talks
//! HTTP to a local bridge daemon that owns the messaging account session.

pub mod address;
pub mod bridge;
pub mod error;
pub mod transport;
pub mod types;

pub use bridge::BridgeTransport;
pub use error::TransportError;
pub use transport::Transport;
pub use types::{Contact, ContactSnapshot};

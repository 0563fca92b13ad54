use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A known contact as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Transport-routable address (e.g. `15550001234@s.whatsapp.net`).
    pub address: String,
    /// Human-readable name as stored in the account's address book.
    #[serde(default)]
    pub display_name: String,
}

/// Point-in-time view of the address book, keyed by address.
pub type ContactSnapshot = HashMap<String, Contact>;

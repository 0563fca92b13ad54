//! HTTP client for a local messaging bridge.
//!
//! The bridge is a separate daemon that holds the paired account session.
//! Wire format:
//!
//! | Method | Path        | Response                                   |
//! |--------|-------------|--------------------------------------------|
//! | GET    | `/status`   | `{"connected": bool}`                      |
//! | POST   | `/send`     | `{"success": bool, "status": "..."}`       |
//! | GET    | `/contacts` | `[{"address": "...", "display_name": "..."}]` |
//!
//! `/contacts` answers `503` while the session is down.

use std::time::Duration;

use async_trait::async_trait;
use courier_core::config::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    address,
    error::TransportError,
    transport::Transport,
    types::{Contact, ContactSnapshot},
};

pub struct BridgeTransport {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct SendBody<'a> {
    to: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct SendReply {
    success: bool,
    #[serde(default)]
    status: String,
}

#[derive(Deserialize)]
struct StatusReply {
    connected: bool,
}

impl BridgeTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(cfg: &TransportConfig) -> Result<Self, TransportError> {
        Self::new(cfg.bridge_url.clone(), Duration::from_secs(cfg.timeout_secs))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into `TransportError::Api`.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_default();
    warn!(status, body = %message, "bridge API error");
    Err(TransportError::Api { status, message })
}

#[async_trait]
impl Transport for BridgeTransport {
    fn name(&self) -> &str {
        "bridge"
    }

    async fn is_connected(&self) -> bool {
        let resp = match self.client.get(self.url("/status")).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "bridge status probe failed");
                return false;
            }
        };
        if !resp.status().is_success() {
            return false;
        }
        resp.json::<StatusReply>()
            .await
            .map(|s| s.connected)
            .unwrap_or(false)
    }

    async fn send(&self, address: &str, text: &str) -> Result<String, TransportError> {
        if !address::is_routable(address) {
            return Err(TransportError::InvalidAddress(address.to_string()));
        }

        debug!(to = %address, chars = text.len(), "sending via bridge");
        let resp = self
            .client
            .post(self.url("/send"))
            .json(&SendBody { to: address, text })
            .send()
            .await?;
        let reply: SendReply = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

        if reply.success {
            Ok(if reply.status.is_empty() {
                "sent".to_string()
            } else {
                reply.status
            })
        } else {
            Err(TransportError::SendFailed(reply.status))
        }
    }

    async fn snapshot_contacts(&self) -> Result<ContactSnapshot, TransportError> {
        let resp = self.client.get(self.url("/contacts")).send().await?;
        if resp.status() == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(TransportError::NotConnected);
        }
        let contacts: Vec<Contact> = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

        Ok(contacts
            .into_iter()
            .map(|c| (c.address.clone(), c))
            .collect())
    }
}

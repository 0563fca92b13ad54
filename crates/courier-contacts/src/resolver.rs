use std::sync::Arc;

use courier_channels::{ContactSnapshot, Transport};
use tracing::debug;

use crate::error::Result;

/// Maps human-readable names to destination addresses.
///
/// Every lookup takes a fresh snapshot from the transport, so contacts added
/// on the phone are visible without a restart.
pub struct ContactResolver {
    transport: Arc<dyn Transport>,
}

impl ContactResolver {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// All addresses whose display name equals `name`, ignoring case and
    /// surrounding whitespace. Sorted ascending; empty when nothing matches.
    pub async fn resolve_by_name(&self, name: &str) -> Result<Vec<String>> {
        let snapshot = self.transport.snapshot_contacts().await?;
        let matches = matching_addresses(&snapshot, name);
        debug!(contact = %name, matches = matches.len(), "resolved contact name");
        Ok(matches)
    }

    /// A single address for `name`, or `None`.
    ///
    /// With duplicate names the lowest address wins, so repeated calls agree.
    /// Callers that need to disambiguate should use [`Self::resolve_by_name`].
    pub async fn resolve_first(&self, name: &str) -> Result<Option<String>> {
        Ok(self.resolve_by_name(name).await?.into_iter().next())
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn matching_addresses(snapshot: &ContactSnapshot, name: &str) -> Vec<String> {
    let wanted = normalize(name);
    if wanted.is_empty() {
        return Vec::new();
    }
    let mut found: Vec<String> = snapshot
        .iter()
        .filter(|(_, c)| normalize(&c.display_name) == wanted)
        .map(|(address, _)| address.clone())
        .collect();
    found.sort();
    found.dedup();
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use async_trait::async_trait;
    use courier_channels::{Contact, TransportError};

    struct Book(Option<Vec<(&'static str, &'static str)>>);

    #[async_trait]
    impl Transport for Book {
        fn name(&self) -> &str {
            "book"
        }
        async fn is_connected(&self) -> bool {
            self.0.is_some()
        }
        async fn send(&self, _address: &str, _text: &str) -> std::result::Result<String, TransportError> {
            Err(TransportError::NotConnected)
        }
        async fn snapshot_contacts(&self) -> std::result::Result<ContactSnapshot, TransportError> {
            let entries = self.0.as_ref().ok_or(TransportError::NotConnected)?;
            Ok(entries
                .iter()
                .map(|(address, display_name)| {
                    (
                        address.to_string(),
                        Contact {
                            address: address.to_string(),
                            display_name: display_name.to_string(),
                        },
                    )
                })
                .collect())
        }
    }

    fn resolver(entries: Vec<(&'static str, &'static str)>) -> ContactResolver {
        ContactResolver::new(Arc::new(Book(Some(entries))))
    }

    #[tokio::test]
    async fn duplicate_names_return_every_address() {
        let r = resolver(vec![
            ("2222@s.whatsapp.net", "Bob"),
            ("1111@s.whatsapp.net", "Bob"),
            ("3333@s.whatsapp.net", "Alice"),
        ]);
        assert_eq!(
            r.resolve_by_name("Bob").await.unwrap(),
            vec!["1111@s.whatsapp.net", "2222@s.whatsapp.net"]
        );
    }

    #[tokio::test]
    async fn resolve_first_is_deterministic() {
        let r = resolver(vec![
            ("2222@s.whatsapp.net", "Bob"),
            ("1111@s.whatsapp.net", "Bob"),
        ]);
        for _ in 0..5 {
            assert_eq!(
                r.resolve_first("bob").await.unwrap().as_deref(),
                Some("1111@s.whatsapp.net")
            );
        }
    }

    #[tokio::test]
    async fn match_ignores_case_and_surrounding_whitespace() {
        let r = resolver(vec![("1@s.whatsapp.net", "  Carol Smith ")]);
        assert_eq!(r.resolve_by_name("carol smith").await.unwrap().len(), 1);
        assert_eq!(r.resolve_by_name("  CAROL SMITH").await.unwrap().len(), 1);
        assert!(r.resolve_by_name("Carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_match_is_empty_not_an_error() {
        let r = resolver(vec![("1@s.whatsapp.net", "Bob")]);
        assert!(r.resolve_by_name("Alice").await.unwrap().is_empty());
        assert!(r.resolve_first("Alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_name_matches_nothing() {
        let r = resolver(vec![("1@s.whatsapp.net", "")]);
        assert!(r.resolve_by_name("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unavailable_snapshot_is_a_lookup_error() {
        let r = ContactResolver::new(Arc::new(Book(None)));
        let err = r.resolve_by_name("Bob").await.unwrap_err();
        assert!(matches!(err, LookupError::Unavailable(TransportError::NotConnected)));
    }
}

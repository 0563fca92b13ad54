//! Helpers for `user@server` style destination addresses.

/// Return the user portion of an address (everything before the first `@`).
///
/// Addresses without a server part are returned unchanged, so a bare phone
/// number maps to itself.
pub fn user_part(address: &str) -> &str {
    address.split('@').next().unwrap_or(address).trim()
}

/// True when `address` is non-empty and contains no whitespace.
pub fn is_routable(address: &str) -> bool {
    !address.is_empty() && !address.chars().any(char::is_whitespace)
}

use courier_channels::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    /// The contact snapshot could not be obtained (e.g. transport offline).
    #[error("Contact list unavailable: {0}")]
    Unavailable(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, LookupError>;

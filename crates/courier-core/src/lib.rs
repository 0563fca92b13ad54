pub mod config;
pub mod error;

pub use config::CourierConfig;
pub use error::{CourierError, Result};

pub mod error;
pub mod resolver;

pub use error::{LookupError, Result};
pub use resolver::ContactResolver;

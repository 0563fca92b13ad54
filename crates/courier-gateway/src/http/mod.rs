pub mod contacts;
pub mod error;
pub mod health;
pub mod jobs;
pub mod schedule;

#[cfg(test)]
pub(crate) mod test_support;

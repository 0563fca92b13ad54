//! `courier-scheduler`: durable delayed-message queue with SQLite persistence.
//!
//! # Overview
//!
//! Pending sends live in the `scheduled_messages` table. The
//! [`engine::SchedulerEngine`] polls the table on a fixed interval, hands
//! every due job to the injected [`courier_channels::Transport`] and flips
//! the job's `sent` flag only after the transport confirms delivery.
//!
//! | Outcome          | Effect on the row                    |
//! |------------------|--------------------------------------|
//! | send succeeded   | `sent = 1`, never selected again     |
//! | send failed      | untouched, retried on the next tick  |
//! | store unreachable| tick skipped, retried on the next tick |
//!
//! Rows are never deleted; the table doubles as the delivery history.

pub mod db;
pub mod engine;
pub mod error;
pub mod store;
pub mod types;

pub use engine::{SchedulerEngine, TickReport};
pub use error::{Result, SchedulerError};
pub use store::JobStore;
pub use types::{JobId, ScheduledJob};

//! Record identifiers for the ward dashboard.
//!
//! Every entity on the ward (patients, tasks, SBAR notes, devices, scale rows, ...) carries an
//! opaque string identifier. Seed data uses short hand-written ids such as `"1"`; anything
//! created at runtime gets a *timestamp id*: the creation instant in milliseconds since the Unix
//! epoch, rendered as decimal digits.
//!
//! This module provides:
//! - [`RecordId`], the opaque identifier stored on entities.
//! - [`TimestampId`] and [`TimestampIdGenerator`], which mint fresh identifiers that are
//!   strictly increasing per generator, even when two records are created within the same
//!   millisecond.

mod service;

pub use service::{RecordId, TimestampId, TimestampIdGenerator};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;

//! Boundary support for the sbarCore record-management backend.
//!
//! The ward dashboard does not own the backend; it reads from it and mirrors a couple of rules
//! its admin panel enforces. This crate provides:
//! - wire models for the backend's JSON resources and translation into plain Rust types
//! - a GET-only HTTP client pointed at the backend's API root
//! - the admin-panel field rules (insertion-site visibility, date/time widget coercion)
//!
//! Nothing here writes to the backend.

pub mod admin;
pub mod client;
pub mod paciente;

// Re-export facades
pub use client::BackendClient;
pub use paciente::Paciente;

// Re-export public domain-level types
pub use admin::{DeviceAdminForm, DeviceTypeCode, InputKind};
pub use paciente::RemotePatient;

/// Default API root of the backend in development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";

/// Errors returned by the `backend` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned {status} for {url}")]
    Status { status: u16, url: String },
}

/// Type alias for Results that can fail with a [`BackendError`].
pub type BackendResult<T> = Result<T, BackendError>;

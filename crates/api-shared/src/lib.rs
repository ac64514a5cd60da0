//! # API Shared
//!
//! Shared definitions for the ward's HTTP surface.
//!
//! Contains:
//! - Request/response DTOs with OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the workspace binaries.

pub mod dto;
pub mod health;

pub use health::HealthService;

//! # UTI Core
//!
//! Domain logic of the ICU ward dashboard.
//!
//! This crate holds the ward's data model and every piece of view state built on it:
//! - The patient roster with search/status filtering and the decubitus (repositioning) timer
//! - The bedside dashboard with nursing tasks
//! - SBAR handover notes, quality indicators and per-shift indicator checklists
//! - Patient, physical-assessment and checklist form controllers with field validation
//! - Staffing-scale import from CSV
//! - Navigation between views and the wall clock
//!
//! Nothing is persisted: a [`Ward`] starts from the seed collections in [`seed`].
//!
//! **No transport concerns**: HTTP handlers belong in `api-rest`, the remote record backend in
//! `backend`.

pub mod assessment;
pub mod checklist;
pub mod clock;
pub mod config;
pub mod constants;
pub mod dashboard;
mod error;
pub mod filter;
pub mod forms;
pub mod import;
pub mod indicators;
pub mod model;
pub mod navigation;
pub mod roster;
pub mod sbar;
pub mod seed;
pub mod validation;
pub mod ward;

pub use config::{CoreConfig, EnvValues};
pub use error::{ImportError, ImportResult, WardError, WardResult};
pub use filter::Filter;
pub use validation::ValidationErrors;
pub use ward::Ward;

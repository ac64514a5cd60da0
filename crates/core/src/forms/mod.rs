//! Form controllers.
//!
//! A form owns an editable copy of an entity. Edits go through typed update values applied by
//! pure functions and never touch the owning collection; only a successful submit hands the
//! finished entity back.

mod assessment;
mod checklist;
mod patient;
mod sections;

pub use assessment::AssessmentForm;
pub use checklist::ChecklistForm;
pub use patient::{PatientDraft, PatientForm, PatientUpdate, SubmitOutcome};
pub use sections::ExpandedSections;

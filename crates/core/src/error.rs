use crate::validation::ValidationErrors;
use uti_ids::{IdError, RecordId};

#[derive(Debug, thiserror::Error)]
pub enum WardError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: RecordId },
    #[error("task {id} cannot move from {from} to {to}")]
    IllegalTransition {
        id: RecordId,
        from: &'static str,
        to: &'static str,
    },
    #[error("invalid identifier: {0}")]
    Id(#[from] IdError),
    #[error("scale import failed: {0}")]
    Import(#[from] ImportError),
}

impl WardError {
    pub(crate) fn not_found(kind: &'static str, id: &RecordId) -> Self {
        WardError::NotFound {
            kind,
            id: id.clone(),
        }
    }
}

pub type WardResult<T> = std::result::Result<T, WardError>;

/// Failures that abort a scale import as a whole.
///
/// Individual bad rows are not errors; they are reported as messages on the import outcome.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("only .csv files can be imported, got '{0}'")]
    NotCsv(String),
    #[error("unexpected header: expected '{expected}', got '{found}'")]
    InvalidHeader { expected: String, found: String },
    #[error("the file is empty")]
    Empty,
    #[error("failed to read scale file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

pub type ImportResult<T> = std::result::Result<T, ImportError>;

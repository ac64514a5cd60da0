//! Backend patient (`Paciente`) wire models and translation helpers.
//!
//! The backend exposes patients under `pacientes/` with Portuguese field names. This module
//! keeps that exact shape private and hands out [`RemotePatient`], a plain Rust carrier with
//! parsed dates.
//!
//! Responsibilities:
//! - Define a strict wire model (unknown keys are rejected)
//! - Report the failing path when a payload does not match the wire schema
//! - Translate between the wire model and [`RemotePatient`]

use crate::{BackendError, BackendResult};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// A patient as recorded by the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemotePatient {
    /// Backend primary key.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Date of birth, when recorded.
    pub birth_date: Option<NaiveDate>,
    /// Mother's name, when recorded.
    pub mother_name: Option<String>,
    /// Bed label.
    pub bed: String,
    /// Admission instant.
    pub admitted_at: DateTime<FixedOffset>,
    /// Discharge instant, once discharged.
    pub discharged_at: Option<DateTime<FixedOffset>>,
    /// Whether the patient is still active on the ward.
    pub active: bool,
}

impl RemotePatient {
    /// Age in completed years on `date`, if the birth date is known and not after `date`.
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        let birth = self.birth_date?;
        if birth > date {
            return None;
        }
        let mut years = date.year() - birth.year();
        if (date.month(), date.day()) < (birth.month(), birth.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    /// Line used when listing remote patients: `"<name> - Leito <bed>"`.
    pub fn label(&self) -> String {
        format!("{} - Leito {}", self.name, self.bed)
    }
}

// ============================================================================
// Public Paciente operations
// ============================================================================

/// Backend patient operations.
///
/// Zero-sized type used for namespacing; all methods are associated functions.
pub struct Paciente;

impl Paciente {
    /// Parse a single backend patient from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Translation`] naming the failing path if the JSON does not match
    /// the wire schema (wrong types, missing fields, unknown keys).
    pub fn parse(json_text: &str) -> BackendResult<RemotePatient> {
        let wire: PacienteWire = decode(json_text, "Paciente")?;
        Ok(wire_to_domain(wire))
    }

    /// Parse the `pacientes/` list payload from JSON text.
    ///
    /// # Errors
    ///
    /// Same as [`Paciente::parse`]; the reported path includes the array index.
    pub fn parse_list(json_text: &str) -> BackendResult<Vec<RemotePatient>> {
        let wire: Vec<PacienteWire> = decode(json_text, "Paciente list")?;
        Ok(wire.into_iter().map(wire_to_domain).collect())
    }

    /// Render a patient back into the backend's JSON shape.
    pub fn render(data: &RemotePatient) -> BackendResult<String> {
        let wire = domain_to_wire(data);
        serde_json::to_string(&wire).map_err(|e| {
            BackendError::Translation(format!("Failed to serialize Paciente: {e}"))
        })
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// Exact JSON structure served by the backend.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct PacienteWire {
    id: i64,
    nome: String,
    #[serde(default)]
    data_nascimento: Option<NaiveDate>,
    #[serde(default)]
    nome_mae: Option<String>,
    leito: String,
    data_admissao: DateTime<FixedOffset>,
    #[serde(default)]
    data_alta: Option<DateTime<FixedOffset>>,
    ativo: bool,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn decode<T: serde::de::DeserializeOwned>(json_text: &str, what: &str) -> BackendResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        BackendError::Translation(format!("{what} schema mismatch at {path}: {source}"))
    })
}

fn wire_to_domain(wire: PacienteWire) -> RemotePatient {
    RemotePatient {
        id: wire.id,
        name: wire.nome,
        birth_date: wire.data_nascimento,
        mother_name: wire.nome_mae.filter(|n| !n.trim().is_empty()),
        bed: wire.leito,
        admitted_at: wire.data_admissao,
        discharged_at: wire.data_alta,
        active: wire.ativo,
    }
}

fn domain_to_wire(data: &RemotePatient) -> PacienteWire {
    PacienteWire {
        id: data.id,
        nome: data.name.clone(),
        data_nascimento: data.birth_date,
        nome_mae: data.mother_name.clone(),
        leito: data.bed.clone(),
        data_admissao: data.admitted_at,
        data_alta: data.discharged_at,
        ativo: data.active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": 7,
        "nome": "João Silva",
        "data_nascimento": "1958-06-02",
        "nome_mae": "Tereza Silva",
        "leito": "101",
        "data_admissao": "2024-01-15T08:30:00-03:00",
        "data_alta": null,
        "ativo": true
    }"#;

    #[test]
    fn parses_and_round_trips_sample() {
        let patient = Paciente::parse(SAMPLE).expect("parse json");
        assert_eq!(patient.name, "João Silva");
        assert_eq!(patient.bed, "101");
        assert_eq!(patient.discharged_at, None);

        let rendered = Paciente::render(&patient).expect("render");
        let reparsed = Paciente::parse(&rendered).expect("reparse");
        assert_eq!(patient, reparsed);
    }

    #[test]
    fn parses_list_payload() {
        let list = format!("[{SAMPLE}]");
        let patients = Paciente::parse_list(&list).expect("parse list");
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].label(), "João Silva - Leito 101");
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let input = r#"{"id": 1, "nome": "Ana Costa", "leito": "104",
            "data_admissao": "2024-01-17T10:00:00Z", "ativo": true}"#;
        let patient = Paciente::parse(input).expect("parse");
        assert_eq!(patient.birth_date, None);
        assert_eq!(patient.mother_name, None);
    }

    #[test]
    fn strict_validation_rejects_unknown_keys() {
        let input = r#"{"id": 1, "nome": "Ana", "leito": "104",
            "data_admissao": "2024-01-17T10:00:00Z", "ativo": true, "prontuario": "x"}"#;
        let err = Paciente::parse(input).expect_err("should reject unknown key");
        match err {
            BackendError::Translation(msg) => assert!(msg.contains("prontuario")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn schema_mismatch_reports_path_into_list() {
        let input = r#"[{"id": 1, "nome": "Ana", "leito": 104,
            "data_admissao": "2024-01-17T10:00:00Z", "ativo": true}]"#;
        let err = Paciente::parse_list(input).expect_err("leito must be a string");
        match err {
            BackendError::Translation(msg) => {
                assert!(msg.contains("[0]"), "{msg}");
                assert!(msg.contains("leito"), "{msg}");
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn age_counts_completed_years() {
        let patient = Paciente::parse(SAMPLE).unwrap();
        let before_birthday = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let on_birthday = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert_eq!(patient.age_on(before_birthday), Some(65));
        assert_eq!(patient.age_on(on_birthday), Some(66));
    }

    #[test]
    fn age_is_unknown_without_birth_date_or_before_birth() {
        let mut patient = Paciente::parse(SAMPLE).unwrap();
        let long_ago = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        assert_eq!(patient.age_on(long_ago), None);

        patient.birth_date = None;
        assert_eq!(patient.age_on(long_ago), None);
    }
}

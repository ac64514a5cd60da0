//! Request and response bodies of the REST API.
//!
//! Domain entities travel in their own camelCase serde shape; the types here are the envelopes
//! and the query strings around them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Error body. `fields` carries per-field validation messages when the request failed validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PatientListQuery {
    /// Case-insensitive substring over name, bed and diagnosis.
    pub search: Option<String>,
    /// `all`, `critical`, `stable` or `recovering`.
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IndicatorQuery {
    /// `all`, `lpp`, `falls`, `extubation` or `medication`.
    #[serde(rename = "type")]
    pub indicator_type: Option<String>,
    /// `all`, `morning`, `afternoon` or `night`.
    pub shift: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChecklistQuery {
    /// `YYYY-MM-DD`; today when absent.
    pub date: Option<String>,
    /// Current shift when absent.
    pub shift: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskReq {
    pub patient_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TaskStatusReq {
    /// `pending`, `in-progress` or `completed`.
    pub status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SbarCreateReq {
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub situation: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub assessment: String,
    #[serde(default)]
    pub recommendation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScaleImportReq {
    /// Name of the uploaded file; must end in `.csv`.
    pub file_name: String,
    /// File body.
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NavigateReq {
    /// `dashboard`, `patients`, `sbar`, `indicators` or `import`.
    pub tab: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSbarReq {
    pub patient_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClockRes {
    /// RFC 3339 instant.
    pub now: String,
    pub shift: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_omits_empty_fields() {
        let json = serde_json::to_string(&ErrorRes::new("not found")).unwrap();
        assert_eq!(json, r#"{"error":"not found"}"#);
    }

    #[test]
    fn sbar_request_defaults_missing_sections() {
        let req: SbarCreateReq = serde_json::from_str(r#"{"patientId": "1", "situation": "x"}"#).unwrap();
        assert_eq!(req.patient_id.as_deref(), Some("1"));
        assert!(req.background.is_empty());
    }
}

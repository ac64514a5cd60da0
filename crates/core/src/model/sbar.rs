use super::Shift;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uti_ids::RecordId;

/// A Situation-Background-Assessment-Recommendation handover note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbarRecord {
    pub id: RecordId,
    pub patient_id: RecordId,
    pub situation: String,
    pub background: String,
    pub assessment: String,
    pub recommendation: String,
    pub created_at: DateTime<Utc>,
    pub shift: Shift,
    pub created_by: String,
}

use super::Shift;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uti_ids::RecordId;

/// One row of the staffing scale: which technician covers which patient, when.
///
/// `patient` is the display name as typed in the scale file; it is not linked to a roster id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleEntry {
    pub id: RecordId,
    pub technician: String,
    pub patient: String,
    pub date: NaiveDate,
    pub shift: Shift,
    pub bed_number: String,
    pub validated: bool,
}

use super::wire_enum;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uti_ids::RecordId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Respiratory,
    Vascular,
    Drainage,
    Monitoring,
}

wire_enum!(DeviceKind {
    Respiratory => "respiratory",
    Vascular => "vascular",
    Drainage => "drainage",
    Monitoring => "monitoring",
});

impl DeviceKind {
    pub fn label(self) -> &'static str {
        match self {
            DeviceKind::Respiratory => "Respiratório",
            DeviceKind::Vascular => "Vascular",
            DeviceKind::Drainage => "Drenagem",
            DeviceKind::Monitoring => "Monitorização",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Active,
    Inactive,
}

wire_enum!(DeviceStatus {
    Active => "active",
    Inactive => "inactive",
});

/// An invasive device or monitor attached to a patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub status: DeviceStatus,
    pub insertion_date: NaiveDate,
}

/// A single-field edit of a [`Device`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum DeviceUpdate {
    Name(String),
    #[serde(rename = "type")]
    Kind(DeviceKind),
    Status(DeviceStatus),
    InsertionDate(NaiveDate),
}

impl Device {
    /// A blank monitoring device, active and inserted on `today`.
    pub fn blank(id: RecordId, today: NaiveDate) -> Self {
        Self {
            id,
            name: String::new(),
            kind: DeviceKind::Monitoring,
            status: DeviceStatus::Active,
            insertion_date: today,
        }
    }

    /// Returns the device with the targeted field replaced.
    pub fn apply(self, update: DeviceUpdate) -> Self {
        match update {
            DeviceUpdate::Name(name) => Self { name, ..self },
            DeviceUpdate::Kind(kind) => Self { kind, ..self },
            DeviceUpdate::Status(status) => Self { status, ..self },
            DeviceUpdate::InsertionDate(insertion_date) => Self {
                insertion_date,
                ..self
            },
        }
    }
}

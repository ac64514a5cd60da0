use super::wire_enum;
use serde::{Deserialize, Serialize};
use uti_ids::RecordId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationKind {
    Sedation,
    Vasoactive,
    Antibiotic,
    Analgesic,
    Other,
}

wire_enum!(MedicationKind {
    Sedation => "sedation",
    Vasoactive => "vasoactive",
    Antibiotic => "antibiotic",
    Analgesic => "analgesic",
    Other => "other",
});

impl MedicationKind {
    pub fn label(self) -> &'static str {
        match self {
            MedicationKind::Sedation => "Sedação",
            MedicationKind::Vasoactive => "Vasoativo",
            MedicationKind::Antibiotic => "Antibiótico",
            MedicationKind::Analgesic => "Analgésico",
            MedicationKind::Other => "Outros",
        }
    }
}

/// A medication on the patient's critical list.
///
/// `critical` is independent of `kind`: any class of drug can be flagged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: RecordId,
    pub name: String,
    pub dosage: String,
    pub route: String,
    pub frequency: String,
    #[serde(rename = "type")]
    pub kind: MedicationKind,
    pub critical: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum MedicationUpdate {
    Name(String),
    Dosage(String),
    Route(String),
    Frequency(String),
    #[serde(rename = "type")]
    Kind(MedicationKind),
    Critical(bool),
}

impl Medication {
    pub fn blank(id: RecordId) -> Self {
        Self {
            id,
            name: String::new(),
            dosage: String::new(),
            route: String::new(),
            frequency: String::new(),
            kind: MedicationKind::Other,
            critical: false,
        }
    }

    pub fn apply(self, update: MedicationUpdate) -> Self {
        match update {
            MedicationUpdate::Name(name) => Self { name, ..self },
            MedicationUpdate::Dosage(dosage) => Self { dosage, ..self },
            MedicationUpdate::Route(route) => Self { route, ..self },
            MedicationUpdate::Frequency(frequency) => Self { frequency, ..self },
            MedicationUpdate::Kind(kind) => Self { kind, ..self },
            MedicationUpdate::Critical(critical) => Self { critical, ..self },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_flag_is_independent_of_kind() {
        let med = Medication::blank(RecordId::parse("3").unwrap())
            .apply(MedicationUpdate::Kind(MedicationKind::Antibiotic))
            .apply(MedicationUpdate::Critical(true));
        assert_eq!(med.kind, MedicationKind::Antibiotic);
        assert!(med.critical);

        let med = med.apply(MedicationUpdate::Kind(MedicationKind::Other));
        assert!(med.critical);
    }

    #[test]
    fn update_decodes_from_field_value_pair() {
        let update: MedicationUpdate =
            serde_json::from_str(r#"{"field": "type", "value": "vasoactive"}"#).unwrap();
        assert_eq!(update, MedicationUpdate::Kind(MedicationKind::Vasoactive));
    }
}

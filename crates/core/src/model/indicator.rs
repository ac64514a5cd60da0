use super::{wire_enum, Shift};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uti_ids::RecordId;

/// Kind of quality indicator, without its payload. Used for filtering and counting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorType {
    Lpp,
    Falls,
    Extubation,
    Medication,
}

wire_enum!(IndicatorType {
    Lpp => "lpp",
    Falls => "falls",
    Extubation => "extubation",
    Medication => "medication",
});

impl IndicatorType {
    pub fn label(self) -> &'static str {
        match self {
            IndicatorType::Lpp => "Lesão por Pressão",
            IndicatorType::Falls => "Quedas",
            IndicatorType::Extubation => "Extubação Acidental",
            IndicatorType::Medication => "Erros de Medicação",
        }
    }
}

/// Indicator kind with the detail only that kind carries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IndicatorKind {
    Lpp {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        location: Option<String>,
    },
    Falls {
        #[serde(default, rename = "fallType", skip_serializing_if = "Option::is_none")]
        fall_type: Option<String>,
    },
    Extubation,
    Medication,
}

impl IndicatorKind {
    pub fn indicator_type(&self) -> IndicatorType {
        match self {
            IndicatorKind::Lpp { .. } => IndicatorType::Lpp,
            IndicatorKind::Falls { .. } => IndicatorType::Falls,
            IndicatorKind::Extubation => IndicatorType::Extubation,
            IndicatorKind::Medication => IndicatorType::Medication,
        }
    }
}

/// A reported quality-indicator event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub id: RecordId,
    #[serde(flatten)]
    pub kind: IndicatorKind,
    pub date: NaiveDate,
    pub shift: Shift,
    pub description: String,
}

impl Indicator {
    pub fn indicator_type(&self) -> IndicatorType {
        self.kind.indicator_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_flat_with_type_tag() {
        let json = r#"{"id": "2", "type": "falls", "fallType": "cama",
            "date": "2024-01-19", "shift": "night", "description": "Queda do leito"}"#;
        let indicator: Indicator = serde_json::from_str(json).unwrap();
        assert_eq!(
            indicator.kind,
            IndicatorKind::Falls {
                fall_type: Some("cama".into())
            }
        );
        assert_eq!(indicator.indicator_type(), IndicatorType::Falls);

        let value = serde_json::to_value(&indicator).unwrap();
        assert_eq!(value["type"], "falls");
        assert_eq!(value["fallType"], "cama");
        assert!(value.get("location").is_none());
    }

    #[test]
    fn kinds_without_detail_have_no_extra_keys() {
        let json = r#"{"id": "3", "type": "extubation", "date": "2024-01-18",
            "shift": "afternoon", "description": "Extubação acidental"}"#;
        let indicator: Indicator = serde_json::from_str(json).unwrap();
        assert_eq!(indicator.kind, IndicatorKind::Extubation);
    }
}

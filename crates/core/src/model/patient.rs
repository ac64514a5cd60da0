use super::{wire_enum, Device, Medication, SbarRecord};
use crate::constants::{DECUBITUS_ATTENTION_MINUTES, DECUBITUS_CRITICAL_MINUTES};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uti_ids::RecordId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatientStatus {
    Stable,
    Critical,
    Recovering,
}

wire_enum!(PatientStatus {
    Stable => "stable",
    Critical => "critical",
    Recovering => "recovering",
});

impl PatientStatus {
    pub fn label(self) -> &'static str {
        match self {
            PatientStatus::Stable => "Estável",
            PatientStatus::Critical => "Crítico",
            PatientStatus::Recovering => "Em recuperação",
        }
    }
}

/// Severity band of a decubitus timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecubitusBand {
    /// Under 90 minutes.
    Normal,
    /// 90 to 119 minutes.
    Attention,
    /// 120 minutes or more.
    Critical,
}

impl DecubitusBand {
    pub fn for_minutes(minutes: u32) -> Self {
        let minutes = i64::from(minutes);
        if minutes >= DECUBITUS_CRITICAL_MINUTES {
            DecubitusBand::Critical
        } else if minutes >= DECUBITUS_ATTENTION_MINUTES {
            DecubitusBand::Attention
        } else {
            DecubitusBand::Normal
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DecubitusBand::Normal => "Normal",
            DecubitusBand::Attention => "Atenção",
            DecubitusBand::Critical => "Crítico",
        }
    }
}

/// A patient on the ward roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: RecordId,
    pub name: String,
    pub age: u32,
    pub bed_number: String,
    pub diagnosis: String,
    pub admission_date: NaiveDate,
    pub status: PatientStatus,
    /// Minutes since the last position change, as of the last refresh.
    pub decubitus_timer: u32,
    pub last_turn: DateTime<Utc>,
}

impl Patient {
    /// Whole minutes elapsed between the last turn and `now`, clamped at zero.
    pub fn minutes_since_turn(&self, now: DateTime<Utc>) -> u32 {
        let minutes = (now - self.last_turn).num_minutes().max(0);
        u32::try_from(minutes).unwrap_or(u32::MAX)
    }

    pub fn decubitus_band(&self, now: DateTime<Utc>) -> DecubitusBand {
        DecubitusBand::for_minutes(self.minutes_since_turn(now))
    }

    /// Re-derives the stored timer from the last turn.
    pub fn refresh_timer(&mut self, now: DateTime<Utc>) {
        self.decubitus_timer = self.minutes_since_turn(now);
    }

    /// Records a position change at `now`: the timer restarts from zero.
    pub fn reset_turn(&mut self, now: DateTime<Utc>) {
        self.decubitus_timer = 0;
        self.last_turn = now;
    }

    /// Case-insensitive substring match across name, bed and diagnosis. The needle is used as
    /// typed, so only an empty one matches everyone.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.name, &self.bed_number, &self.diagnosis]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// A patient with the clinical detail shown on the patient page and edited in the patient form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetail {
    #[serde(flatten)]
    pub patient: Patient,
    pub medical_record: String,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub critical_medications: Vec<Medication>,
    #[serde(default, rename = "currentSBAR", skip_serializing_if = "Option::is_none")]
    pub current_sbar: Option<SbarRecord>,
}

impl PatientDetail {
    pub fn id(&self) -> &RecordId {
        &self.patient.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn patient(last_turn: DateTime<Utc>) -> Patient {
        Patient {
            id: RecordId::parse("1").unwrap(),
            name: "João Silva".into(),
            age: 65,
            bed_number: "101".into(),
            diagnosis: "Pneumonia grave".into(),
            admission_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            status: PatientStatus::Critical,
            decubitus_timer: 85,
            last_turn,
        }
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(DecubitusBand::for_minutes(0), DecubitusBand::Normal);
        assert_eq!(DecubitusBand::for_minutes(89), DecubitusBand::Normal);
        assert_eq!(DecubitusBand::for_minutes(90), DecubitusBand::Attention);
        assert_eq!(DecubitusBand::for_minutes(119), DecubitusBand::Attention);
        assert_eq!(DecubitusBand::for_minutes(120), DecubitusBand::Critical);
        assert_eq!(DecubitusBand::for_minutes(600), DecubitusBand::Critical);
    }

    #[test]
    fn reset_zeroes_timer_and_stamps_turn() {
        let start = Utc.with_ymd_and_hms(2024, 1, 20, 14, 30, 0).unwrap();
        let mut p = patient(start);
        let now = start + Duration::minutes(95);
        p.refresh_timer(now);
        assert_eq!(p.decubitus_timer, 95);

        p.reset_turn(now);
        assert_eq!(p.decubitus_timer, 0);
        assert_eq!(p.last_turn, now);
        assert_eq!(p.decubitus_band(now), DecubitusBand::Normal);
    }

    #[test]
    fn elapsed_time_is_derived_and_clamped() {
        let start = Utc.with_ymd_and_hms(2024, 1, 20, 14, 30, 0).unwrap();
        let p = patient(start);
        assert_eq!(p.minutes_since_turn(start + Duration::seconds(7259)), 120);
        assert_eq!(p.minutes_since_turn(start - Duration::minutes(5)), 0);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let p = patient(Utc::now());
        assert!(p.matches_search("joão"));
        assert!(p.matches_search("101"));
        assert!(p.matches_search("PNEUMONIA"));
        assert!(p.matches_search(""));
        assert!(p.matches_search("o S"));
        assert!(!p.matches_search(" joão"));
        assert!(!p.matches_search("sepse"));
    }

    #[test]
    fn detail_flattens_patient_fields() {
        let detail = PatientDetail {
            patient: patient(Utc.with_ymd_and_hms(2024, 1, 20, 14, 30, 0).unwrap()),
            medical_record: "2024001234".into(),
            devices: Vec::new(),
            critical_medications: Vec::new(),
            current_sbar: None,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["bedNumber"], "101");
        assert_eq!(json["medicalRecord"], "2024001234");
        assert!(json.get("currentSBAR").is_none());

        let back: PatientDetail = serde_json::from_value(json).unwrap();
        assert_eq!(back, detail);
    }
}

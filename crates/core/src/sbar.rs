//! SBAR note entry and history.

use crate::constants::UNKNOWN_PATIENT_LABEL;
use crate::model::{SbarRecord, Shift};
use crate::roster::Roster;
use crate::validation::ValidationErrors;
use crate::{WardError, WardResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uti_ids::{RecordId, TimestampIdGenerator};

/// The four free-text sections of a note being written.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbarDraft {
    #[serde(default)]
    pub situation: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub assessment: String,
    #[serde(default)]
    pub recommendation: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SbarField {
    Situation,
    Background,
    Assessment,
    Recommendation,
}

impl SbarDraft {
    pub fn with(self, field: SbarField, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            SbarField::Situation => Self {
                situation: value,
                ..self
            },
            SbarField::Background => Self {
                background: value,
                ..self
            },
            SbarField::Assessment => Self {
                assessment: value,
                ..self
            },
            SbarField::Recommendation => Self {
                recommendation: value,
                ..self
            },
        }
    }
}

/// SBAR form state plus the note history, newest first.
#[derive(Clone, Debug, Default)]
pub struct SbarBoard {
    records: Vec<SbarRecord>,
    selected_patient: Option<RecordId>,
    draft: SbarDraft,
}

impl SbarBoard {
    pub fn new(records: Vec<SbarRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[SbarRecord] {
        &self.records
    }

    pub fn selected_patient(&self) -> Option<&RecordId> {
        self.selected_patient.as_ref()
    }

    pub fn select_patient(&mut self, patient_id: Option<RecordId>) {
        self.selected_patient = patient_id;
    }

    pub fn draft(&self) -> &SbarDraft {
        &self.draft
    }

    pub fn edit(&mut self, field: SbarField, value: impl Into<String>) {
        self.draft = std::mem::take(&mut self.draft).with(field, value);
    }

    pub fn set_draft(&mut self, draft: SbarDraft) {
        self.draft = draft;
    }

    /// Files the current draft for the selected patient.
    ///
    /// The new record goes to the top of the history and the draft is cleared; the patient
    /// selection is kept.
    ///
    /// # Errors
    ///
    /// [`WardError::Validation`] on `patientId` when no patient is selected. The draft is kept.
    pub fn submit(
        &mut self,
        shift: Shift,
        created_by: &str,
        ids: &mut TimestampIdGenerator,
        now: DateTime<Utc>,
    ) -> WardResult<&SbarRecord> {
        let patient_id = self.target(None)?;
        let draft = std::mem::take(&mut self.draft);
        Ok(self.push(patient_id, draft, shift, created_by, ids, now))
    }

    /// Files a complete note without touching the board's draft.
    ///
    /// `patient_id` falls back to the selected patient.
    ///
    /// # Errors
    ///
    /// [`WardError::Validation`] on `patientId` when neither is set.
    pub fn file(
        &mut self,
        patient_id: Option<RecordId>,
        note: SbarDraft,
        shift: Shift,
        created_by: &str,
        ids: &mut TimestampIdGenerator,
        now: DateTime<Utc>,
    ) -> WardResult<&SbarRecord> {
        let patient_id = self.target(patient_id)?;
        Ok(self.push(patient_id, note, shift, created_by, ids, now))
    }

    fn target(&self, patient_id: Option<RecordId>) -> WardResult<RecordId> {
        patient_id
            .or_else(|| self.selected_patient.clone())
            .ok_or_else(|| {
                let mut errors = ValidationErrors::new();
                errors.add("patientId", "Selecione um paciente");
                WardError::Validation(errors)
            })
    }

    fn push(
        &mut self,
        patient_id: RecordId,
        note: SbarDraft,
        shift: Shift,
        created_by: &str,
        ids: &mut TimestampIdGenerator,
        now: DateTime<Utc>,
    ) -> &SbarRecord {
        let record = SbarRecord {
            id: ids.next_record_id_at(now),
            patient_id,
            situation: note.situation,
            background: note.background,
            assessment: note.assessment,
            recommendation: note.recommendation,
            created_at: now,
            shift,
            created_by: created_by.into(),
        };
        tracing::info!(record_id = %record.id, patient_id = %record.patient_id, "SBAR record filed");
        self.records.insert(0, record);
        &self.records[0]
    }

    /// Records written in `shift`, newest first.
    pub fn for_shift(&self, shift: Shift) -> Vec<&SbarRecord> {
        self.records.iter().filter(|r| r.shift == shift).collect()
    }

    pub fn for_patient<'a>(&'a self, patient_id: &'a RecordId) -> impl Iterator<Item = &'a SbarRecord> + 'a {
        self.records.iter().filter(move |r| &r.patient_id == patient_id)
    }
}

/// `"<name> - Leito <bed>"` for a roster patient, or a not-found label.
pub fn patient_label(roster: &Roster, patient_id: &RecordId) -> String {
    match roster.get(patient_id) {
        Some(detail) => format!(
            "{} - Leito {}",
            detail.patient.name, detail.patient.bed_number
        ),
        None => UNKNOWN_PATIENT_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 20, 16, 0, 0).unwrap()
    }

    fn id(raw: &str) -> RecordId {
        RecordId::parse(raw).unwrap()
    }

    #[test]
    fn submit_requires_a_patient() {
        let mut board = SbarBoard::new(Vec::new());
        board.edit(SbarField::Situation, "Dispneia");
        let mut ids = TimestampIdGenerator::new();
        match board.submit(Shift::Afternoon, "Enfermeiro João", &mut ids, now()) {
            Err(WardError::Validation(errors)) => assert!(errors.contains("patientId")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(board.records().is_empty());
        assert_eq!(board.draft().situation, "Dispneia");
    }

    #[test]
    fn submit_prepends_and_resets_draft() {
        let data = seed(now()).unwrap();
        let mut board = SbarBoard::new(data.sbar_records);
        let mut ids = TimestampIdGenerator::new();
        board.select_patient(Some(id("2")));
        board.edit(SbarField::Situation, "Dor torácica");
        board.edit(SbarField::Recommendation, "ECG");

        let record = board
            .submit(Shift::Night, "Enfermeira Ana", &mut ids, now())
            .unwrap()
            .clone();

        assert_eq!(board.records().len(), 2);
        assert_eq!(board.records()[0], record);
        assert_eq!(record.patient_id, id("2"));
        assert_eq!(record.shift, Shift::Night);
        assert_eq!(record.created_by, "Enfermeira Ana");
        assert_eq!(record.recommendation, "ECG");
        assert_eq!(board.draft(), &SbarDraft::default());
        assert_eq!(board.selected_patient(), Some(&id("2")));
        assert_eq!(board.for_shift(Shift::Night).len(), 1);
        assert_eq!(board.for_shift(Shift::Afternoon).len(), 1);
    }

    #[test]
    fn filing_a_note_leaves_the_draft_alone() {
        let mut board = SbarBoard::new(Vec::new());
        let mut ids = TimestampIdGenerator::new();
        board.edit(SbarField::Background, "DPOC");
        let note = SbarDraft::default().with(SbarField::Situation, "Febre");

        let rejected = board.file(None, note.clone(), Shift::Morning, "Enf", &mut ids, now());
        assert!(matches!(rejected, Err(WardError::Validation(_))));
        assert_eq!(board.draft().background, "DPOC");

        let record = board
            .file(Some(id("3")), note, Shift::Morning, "Enf", &mut ids, now())
            .unwrap();
        assert_eq!(record.situation, "Febre");
        assert_eq!(record.patient_id, id("3"));
        assert_eq!(board.draft().background, "DPOC");
        assert_eq!(board.selected_patient(), None);
    }

    #[test]
    fn labels_patients() {
        let roster = Roster::new(seed(now()).unwrap().patients);
        assert_eq!(patient_label(&roster, &id("1")), "João Silva - Leito 101");
        assert_eq!(patient_label(&roster, &id("42")), "Paciente não encontrado");
    }
}

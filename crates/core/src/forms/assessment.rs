use crate::assessment::{AssessmentRecord, AssessmentUpdate, PhysicalAssessment};
use crate::validation::ValidationErrors;
use chrono::{DateTime, FixedOffset, Utc};
use uti_ids::{RecordId, TimestampIdGenerator};

/// Physical-assessment entry for one patient, with that patient's saved assessments newest first.
#[derive(Clone, Debug)]
pub struct AssessmentForm {
    patient_id: RecordId,
    draft: AssessmentRecord,
    assessments: Vec<PhysicalAssessment>,
}

impl AssessmentForm {
    /// Opens the form with a draft dated `now` in the ward's local time.
    pub fn new(
        patient_id: RecordId,
        assessed_by: &str,
        now: DateTime<FixedOffset>,
        assessments: Vec<PhysicalAssessment>,
    ) -> Self {
        Self {
            draft: AssessmentRecord::template(patient_id.clone(), assessed_by, now.naive_local()),
            patient_id,
            assessments,
        }
    }

    pub fn patient_id(&self) -> &RecordId {
        &self.patient_id
    }

    pub fn draft(&self) -> &AssessmentRecord {
        &self.draft
    }

    pub fn assessments(&self) -> &[PhysicalAssessment] {
        &self.assessments
    }

    pub fn into_assessments(self) -> Vec<PhysicalAssessment> {
        self.assessments
    }

    pub fn update(&mut self, update: AssessmentUpdate) {
        self.draft = self.draft.clone().apply(update);
    }

    /// Range-checks the draft and files it at the top of the list.
    ///
    /// The draft keeps its system findings for the next entry; date and time move to `now` (local
    /// wall time) and the general observations are cleared.
    pub fn save(
        &mut self,
        ids: &mut TimestampIdGenerator,
        now: DateTime<FixedOffset>,
    ) -> Result<&PhysicalAssessment, ValidationErrors> {
        self.draft.validate().into_result()?;

        let mut record = self.draft.clone();
        record.patient_id = self.patient_id.clone();
        let saved = PhysicalAssessment {
            id: ids.next_record_id_at(now.with_timezone(&Utc)),
            record,
        };
        tracing::info!(assessment_id = %saved.id, patient_id = %self.patient_id, "assessment saved");
        self.assessments.insert(0, saved);

        let local = now.naive_local();
        self.draft.date = local.date();
        self.draft.time = local.time();
        self.draft.general_observations.clear();
        Ok(&self.assessments[0])
    }

    /// Removes the assessment at `index`; out-of-range indices change nothing.
    pub fn remove(&mut self, index: usize) -> Option<PhysicalAssessment> {
        (index < self.assessments.len()).then(|| self.assessments.remove(index))
    }
}

use crate::model::{
    Device, DeviceUpdate, Medication, MedicationUpdate, Patient, PatientDetail, PatientStatus,
    SbarRecord,
};
use crate::validation::ValidationErrors;
use crate::{WardError, WardResult};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uti_ids::{RecordId, TimestampIdGenerator};
use uti_types::is_blank;

/// Editable copy of a patient. `id` stays empty until the first save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDraft {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub name: String,
    pub age: u32,
    pub bed_number: String,
    pub diagnosis: String,
    pub medical_record: String,
    pub admission_date: Option<NaiveDate>,
    pub status: PatientStatus,
    pub decubitus_timer: u32,
    pub last_turn: DateTime<Utc>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub critical_medications: Vec<Medication>,
    #[serde(default, rename = "currentSBAR", skip_serializing_if = "Option::is_none")]
    pub current_sbar: Option<SbarRecord>,
}

impl PatientDraft {
    /// Defaults of a brand-new patient admitted `now`, on the ward's local date.
    pub fn blank(now: DateTime<FixedOffset>) -> Self {
        Self {
            id: None,
            name: String::new(),
            age: 0,
            bed_number: String::new(),
            diagnosis: String::new(),
            medical_record: String::new(),
            admission_date: Some(now.date_naive()),
            status: PatientStatus::Stable,
            decubitus_timer: 0,
            last_turn: now.with_timezone(&Utc),
            devices: Vec::new(),
            critical_medications: Vec::new(),
            current_sbar: None,
        }
    }

    pub fn apply(self, update: PatientUpdate) -> Self {
        match update {
            PatientUpdate::Name(name) => Self { name, ..self },
            PatientUpdate::Age(age) => Self { age, ..self },
            PatientUpdate::BedNumber(bed_number) => Self { bed_number, ..self },
            PatientUpdate::Diagnosis(diagnosis) => Self { diagnosis, ..self },
            PatientUpdate::MedicalRecord(medical_record) => Self {
                medical_record,
                ..self
            },
            PatientUpdate::AdmissionDate(admission_date) => Self {
                admission_date,
                ..self
            },
            PatientUpdate::Status(status) => Self { status, ..self },
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check(is_blank(&self.name), "name", "Nome é obrigatório");
        errors.check(self.age == 0, "age", "Idade deve ser maior que 0");
        errors.check(
            is_blank(&self.bed_number),
            "bedNumber",
            "Número do leito é obrigatório",
        );
        errors.check(
            is_blank(&self.diagnosis),
            "diagnosis",
            "Diagnóstico é obrigatório",
        );
        errors.check(
            is_blank(&self.medical_record),
            "medicalRecord",
            "Prontuário é obrigatório",
        );
        errors.check(
            self.admission_date.is_none(),
            "admissionDate",
            "Data de internação é obrigatória",
        );
        errors
    }
}

impl From<&PatientDetail> for PatientDraft {
    fn from(detail: &PatientDetail) -> Self {
        let p = &detail.patient;
        Self {
            id: Some(p.id.clone()),
            name: p.name.clone(),
            age: p.age,
            bed_number: p.bed_number.clone(),
            diagnosis: p.diagnosis.clone(),
            medical_record: detail.medical_record.clone(),
            admission_date: Some(p.admission_date),
            status: p.status,
            decubitus_timer: p.decubitus_timer,
            last_turn: p.last_turn,
            devices: detail.devices.clone(),
            critical_medications: detail.critical_medications.clone(),
            current_sbar: detail.current_sbar.clone(),
        }
    }
}

/// A single top-level field edit of the patient form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum PatientUpdate {
    Name(String),
    Age(u32),
    BedNumber(String),
    Diagnosis(String),
    MedicalRecord(String),
    AdmissionDate(Option<NaiveDate>),
    Status(PatientStatus),
}

/// What a submit attempt did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The entity was handed to the save callback; the form can close.
    Saved(RecordId),
    /// Nothing was saved.
    Invalid(ValidationErrors),
}

#[derive(Clone, Debug)]
pub struct PatientForm {
    draft: PatientDraft,
    errors: ValidationErrors,
}

impl PatientForm {
    /// A form for admitting a new patient.
    pub fn create(now: DateTime<FixedOffset>) -> Self {
        Self {
            draft: PatientDraft::blank(now),
            errors: ValidationErrors::new(),
        }
    }

    /// A form editing a copy of `detail`.
    pub fn edit(detail: &PatientDetail) -> Self {
        Self {
            draft: PatientDraft::from(detail),
            errors: ValidationErrors::new(),
        }
    }

    /// Create mode when `detail` is `None`, edit mode otherwise.
    pub fn open(detail: Option<&PatientDetail>, now: DateTime<FixedOffset>) -> Self {
        match detail {
            Some(detail) => Self::edit(detail),
            None => Self::create(now),
        }
    }

    pub fn from_draft(draft: PatientDraft) -> Self {
        Self {
            draft,
            errors: ValidationErrors::new(),
        }
    }

    pub fn draft(&self) -> &PatientDraft {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.draft.id.is_some()
    }

    /// Errors of the last failed submit.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn update(&mut self, update: PatientUpdate) {
        self.draft = self.draft.clone().apply(update);
    }

    /// Appends a blank device inserted on `now`'s local date.
    pub fn add_device(
        &mut self,
        ids: &mut TimestampIdGenerator,
        now: DateTime<FixedOffset>,
    ) -> &Device {
        let device = Device::blank(
            ids.next_record_id_at(now.with_timezone(&Utc)),
            now.date_naive(),
        );
        self.draft.devices.push(device);
        &self.draft.devices[self.draft.devices.len() - 1]
    }

    pub fn update_device(&mut self, index: usize, update: DeviceUpdate) -> WardResult<&Device> {
        let slot = self
            .draft
            .devices
            .get_mut(index)
            .ok_or_else(|| WardError::InvalidInput(format!("no device at index {index}")))?;
        *slot = slot.clone().apply(update);
        Ok(&*slot)
    }

    /// Drops the device at `index`; later devices shift down. Out-of-range indices change nothing.
    pub fn remove_device(&mut self, index: usize) -> Option<Device> {
        (index < self.draft.devices.len()).then(|| self.draft.devices.remove(index))
    }

    pub fn add_medication(
        &mut self,
        ids: &mut TimestampIdGenerator,
        now: DateTime<Utc>,
    ) -> &Medication {
        let medication = Medication::blank(ids.next_record_id_at(now));
        self.draft.critical_medications.push(medication);
        &self.draft.critical_medications[self.draft.critical_medications.len() - 1]
    }

    pub fn update_medication(
        &mut self,
        index: usize,
        update: MedicationUpdate,
    ) -> WardResult<&Medication> {
        let slot = self
            .draft
            .critical_medications
            .get_mut(index)
            .ok_or_else(|| WardError::InvalidInput(format!("no medication at index {index}")))?;
        *slot = slot.clone().apply(update);
        Ok(&*slot)
    }

    pub fn remove_medication(&mut self, index: usize) -> Option<Medication> {
        (index < self.draft.critical_medications.len())
            .then(|| self.draft.critical_medications.remove(index))
    }

    /// Validates the draft and, when clean, hands the finished patient to `on_save`.
    ///
    /// A missing id is generated first. Text fields are saved exactly as typed; blankness is only
    /// a validation concern. On failure `on_save` is not called and the errors are kept on the
    /// form.
    pub fn submit(
        &mut self,
        ids: &mut TimestampIdGenerator,
        now: DateTime<Utc>,
        on_save: impl FnOnce(PatientDetail),
    ) -> SubmitOutcome {
        self.errors = self.draft.validate();
        let Some(admission_date) = self.draft.admission_date else {
            return SubmitOutcome::Invalid(self.errors.clone());
        };
        if !self.errors.is_empty() {
            tracing::debug!(fields = %self.errors, "patient form rejected");
            return SubmitOutcome::Invalid(self.errors.clone());
        }

        let id = match &self.draft.id {
            Some(id) => id.clone(),
            None => {
                let id = ids.next_record_id_at(now);
                self.draft.id = Some(id.clone());
                id
            }
        };

        let draft = &self.draft;
        let detail = PatientDetail {
            patient: Patient {
                id: id.clone(),
                name: draft.name.clone(),
                age: draft.age,
                bed_number: draft.bed_number.clone(),
                diagnosis: draft.diagnosis.clone(),
                admission_date,
                status: draft.status,
                decubitus_timer: draft.decubitus_timer,
                last_turn: draft.last_turn,
            },
            medical_record: draft.medical_record.clone(),
            devices: draft.devices.clone(),
            critical_medications: draft.critical_medications.clone(),
            current_sbar: draft.current_sbar.clone(),
        };
        on_save(detail);
        SubmitOutcome::Saved(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeviceKind;
    use crate::roster::Roster;
    use crate::seed::seed;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 20, 16, 0, 0).unwrap()
    }

    fn brasilia() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn local() -> DateTime<FixedOffset> {
        now().with_timezone(&brasilia())
    }

    fn filled() -> PatientForm {
        let mut form = PatientForm::create(local());
        for update in [
            PatientUpdate::Name("Pedro Alves".into()),
            PatientUpdate::Age(54),
            PatientUpdate::BedNumber("107".into()),
            PatientUpdate::Diagnosis("Choque séptico".into()),
            PatientUpdate::MedicalRecord("2024009999".into()),
        ] {
            form.update(update);
        }
        form
    }

    #[test]
    fn create_mode_seeds_defaults() {
        let form = PatientForm::open(None, local());
        let draft = form.draft();
        assert!(!form.is_editing());
        assert_eq!(draft.age, 0);
        assert_eq!(draft.status, PatientStatus::Stable);
        assert_eq!(draft.admission_date, Some(now().date_naive()));
        assert_eq!(draft.last_turn, now());
        assert!(draft.devices.is_empty());
    }

    #[test]
    fn admission_defaults_to_the_local_date() {
        let late_evening = Utc.with_ymd_and_hms(2024, 1, 21, 1, 30, 0).unwrap();
        let form = PatientForm::create(late_evening.with_timezone(&brasilia()));
        let date = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        assert_eq!(form.draft().admission_date, Some(date));
        assert_eq!(form.draft().last_turn, late_evening);
    }

    #[test]
    fn whitespace_only_name_is_still_blank() {
        let mut form = filled();
        form.update(PatientUpdate::Name("   ".into()));
        let SubmitOutcome::Invalid(errors) =
            form.submit(&mut TimestampIdGenerator::new(), now(), |_| {})
        else {
            panic!("blank name must not save");
        };
        assert!(errors.contains("name"));
    }

    #[test]
    fn zero_age_blocks_save() {
        let mut form = filled();
        form.update(PatientUpdate::Age(0));
        let mut called = false;
        let outcome = form.submit(&mut TimestampIdGenerator::new(), now(), |_| called = true);
        match outcome {
            SubmitOutcome::Invalid(errors) => {
                assert_eq!(errors.get("age"), Some("Idade deve ser maior que 0"));
                assert_eq!(errors.len(), 1);
            }
            other => panic!("expected invalid, got {other:?}"),
        }
        assert!(!called);
        assert!(form.errors().contains("age"));
    }

    #[test]
    fn every_violation_is_reported_at_once() {
        let mut form = PatientForm::create(local());
        form.update(PatientUpdate::AdmissionDate(None));
        let SubmitOutcome::Invalid(errors) =
            form.submit(&mut TimestampIdGenerator::new(), now(), |_| {})
        else {
            panic!("blank form must not save");
        };
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec![
                "admissionDate",
                "age",
                "bedNumber",
                "diagnosis",
                "medicalRecord",
                "name"
            ]
        );
    }

    #[test]
    fn created_patient_reads_back_from_roster() {
        let mut roster = Roster::new(seed(now()).unwrap().patients);
        let mut form = filled();
        form.update(PatientUpdate::Name(" Pedro Alves ".into()));
        form.update(PatientUpdate::BedNumber("107 ".into()));
        let outcome = form.submit(&mut TimestampIdGenerator::new(), now(), |detail| {
            roster.save(detail);
        });
        let SubmitOutcome::Saved(id) = outcome else {
            panic!("valid form must save");
        };

        let saved = roster.require(&id).unwrap();
        assert_eq!(roster.len(), 7);
        assert_eq!(saved.patient.name, " Pedro Alves ");
        assert_eq!(saved.patient.age, 54);
        assert_eq!(saved.patient.bed_number, "107 ");
        assert_eq!(saved.patient.diagnosis, "Choque séptico");
        assert_eq!(saved.medical_record, "2024009999");
        assert_eq!(saved.patient.admission_date, now().date_naive());
        assert_eq!(saved.patient.status, PatientStatus::Stable);
        assert_eq!(saved.patient.decubitus_timer, 0);
        assert_eq!(saved.patient.last_turn, now());
    }

    #[test]
    fn editing_keeps_the_id() {
        let roster = Roster::new(seed(now()).unwrap().patients);
        let joao = roster.require(&RecordId::parse("1").unwrap()).unwrap();
        let mut form = PatientForm::edit(joao);
        assert!(form.is_editing());
        form.update(PatientUpdate::BedNumber("101A".into()));

        let mut saved = None;
        let outcome = form.submit(&mut TimestampIdGenerator::new(), now(), |d| saved = Some(d));
        assert_eq!(outcome, SubmitOutcome::Saved(RecordId::parse("1").unwrap()));
        let saved = saved.unwrap();
        assert_eq!(saved.patient.bed_number, "101A");
        assert_eq!(saved.devices.len(), 4);
        assert_eq!(joao.patient.bed_number, "101");
    }

    #[test]
    fn removing_a_device_shifts_later_ones() {
        let roster = Roster::new(seed(now()).unwrap().patients);
        let mut form = PatientForm::edit(roster.require(&RecordId::parse("1").unwrap()).unwrap());
        let third = form.draft().devices[2].clone();

        let removed = form.remove_device(1).unwrap();
        assert_eq!(removed.name, "Cateter Venoso Central");
        assert_eq!(form.draft().devices.len(), 3);
        assert_eq!(form.draft().devices[1], third);
        assert!(form.remove_device(10).is_none());
        assert_eq!(form.draft().devices.len(), 3);
    }

    #[test]
    fn sub_list_edits_target_one_item() {
        let mut form = filled();
        let mut ids = TimestampIdGenerator::new();
        form.add_device(&mut ids, local());
        form.add_device(&mut ids, local());
        form.update_device(1, DeviceUpdate::Kind(DeviceKind::Vascular))
            .unwrap();
        assert_eq!(form.draft().devices[0].kind, DeviceKind::Monitoring);
        assert_eq!(form.draft().devices[1].kind, DeviceKind::Vascular);
        assert_ne!(form.draft().devices[0].id, form.draft().devices[1].id);
        assert!(form
            .update_device(5, DeviceUpdate::Name("x".into()))
            .is_err());

        form.add_medication(&mut ids, now());
        form.update_medication(0, MedicationUpdate::Critical(true))
            .unwrap();
        assert!(form.draft().critical_medications[0].critical);
        assert!(form.remove_medication(0).is_some());
        assert!(form.draft().critical_medications.is_empty());
    }
}

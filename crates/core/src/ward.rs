//! The whole ward state behind the dashboard.
//!
//! Every view keeps its own state object; [`Ward`] owns them all together with the configuration,
//! the clock and the id generator, and implements the operations that cut across views (a task
//! needs a roster patient, a new SBAR note needs the current shift, an import needs the beds).
//!
//! Operations that record an event take the event's instant as `now`; the wall clock only backs
//! the displayed time. Shifts and calendar dates are read in the configured local offset.

use crate::assessment::PhysicalAssessment;
use crate::checklist::{ChecklistBook, ChecklistKey, IndicatorChecklist};
use crate::clock::{local_date, shift_at, WallClock};
use crate::config::CoreConfig;
use crate::dashboard::{Dashboard, PatientCard};
use crate::forms::{AssessmentForm, ChecklistForm, PatientForm, SubmitOutcome};
use crate::import::{ImportReport, ScaleBoard};
use crate::indicators::IndicatorBoard;
use crate::model::{Patient, SbarRecord, Shift, Task};
use crate::navigation::Shell;
use crate::roster::Roster;
use crate::sbar::{SbarBoard, SbarDraft};
use crate::seed::{seed, SeedData};
use crate::{ImportResult, WardResult};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use uti_ids::{RecordId, TimestampIdGenerator};

pub struct Ward {
    config: Arc<CoreConfig>,
    ids: TimestampIdGenerator,
    clock: WallClock,
    roster: Roster,
    dashboard: Dashboard,
    sbar: SbarBoard,
    indicators: IndicatorBoard,
    scale: ScaleBoard,
    checklists: ChecklistBook,
    assessments: Vec<PhysicalAssessment>,
    shell: Shell,
}

impl Ward {
    pub fn new(config: Arc<CoreConfig>, data: SeedData, now: DateTime<Utc>) -> Self {
        let mut ward = Self {
            config,
            ids: TimestampIdGenerator::new(),
            clock: WallClock::new(now),
            roster: Roster::new(data.patients),
            dashboard: Dashboard::new(data.tasks),
            sbar: SbarBoard::new(data.sbar_records),
            indicators: IndicatorBoard::new(data.indicators),
            scale: ScaleBoard::new(data.scale_entries),
            checklists: ChecklistBook::new(),
            assessments: data.assessments,
            shell: Shell::new(),
        };
        ward.roster.refresh_timers(now);
        ward
    }

    /// A ward loaded with the seed collections, anchored at `now`.
    pub fn seeded(config: Arc<CoreConfig>, now: DateTime<Utc>) -> WardResult<Self> {
        let data = seed(now)?;
        tracing::info!(patients = data.patients.len(), "ward seeded");
        Ok(Self::new(config, data, now))
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The local calendar date of the wall clock.
    pub fn today(&self) -> NaiveDate {
        local_date(self.clock.now(), self.config.utc_offset())
    }

    pub fn current_shift(&self) -> Shift {
        self.clock
            .current_shift(self.config.utc_offset(), self.config.pinned_shift())
    }

    /// The shift an event at `instant` is filed under.
    pub fn shift_at(&self, instant: DateTime<Utc>) -> Shift {
        shift_at(instant, self.config.utc_offset(), self.config.pinned_shift())
    }

    /// `instant` in the ward's local time.
    pub fn local_time(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.config.utc_offset())
    }

    /// Lets the wall clock catch up with an event instant and hands the instant back.
    fn observe(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.clock.tick(now);
        now
    }

    /// Advances the clock and re-derives every decubitus timer.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.clock.tick(now);
        self.roster.refresh_timers(self.clock.now());
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    pub fn sbar(&self) -> &SbarBoard {
        &self.sbar
    }

    pub fn sbar_mut(&mut self) -> &mut SbarBoard {
        &mut self.sbar
    }

    pub fn indicators(&self) -> &IndicatorBoard {
        &self.indicators
    }

    pub fn scale(&self) -> &ScaleBoard {
        &self.scale
    }

    pub fn scale_mut(&mut self) -> &mut ScaleBoard {
        &mut self.scale
    }

    pub fn checklists(&self) -> &ChecklistBook {
        &self.checklists
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut Shell {
        &mut self.shell
    }

    pub fn cards(&self) -> Vec<PatientCard> {
        self.dashboard.cards(&self.roster, self.clock.now())
    }

    /// Opens the patient form: edit mode for a roster patient, create mode for `None`.
    pub fn patient_form(
        &self,
        id: Option<&RecordId>,
        now: DateTime<Utc>,
    ) -> WardResult<PatientForm> {
        let detail = id.map(|id| self.roster.require(id)).transpose()?;
        Ok(PatientForm::open(detail, self.local_time(now)))
    }

    /// Submits a patient form into the roster.
    pub fn save_patient(&mut self, form: &mut PatientForm, now: DateTime<Utc>) -> SubmitOutcome {
        let now = self.observe(now);
        let roster = &mut self.roster;
        form.submit(&mut self.ids, now, |detail| {
            roster.save(detail);
        })
    }

    /// Records a position change at `now`.
    pub fn reset_turn(&mut self, id: &RecordId, now: DateTime<Utc>) -> WardResult<&Patient> {
        let now = self.observe(now);
        self.roster.reset_turn(id, now)
    }

    /// Adds a default task for a roster patient, assigned to the configured nurse.
    pub fn add_task(&mut self, patient_id: &RecordId, now: DateTime<Utc>) -> WardResult<&Task> {
        self.roster.require(patient_id)?;
        let now = self.observe(now);
        self.dashboard.add_task(
            patient_id.clone(),
            self.config.nurse_name(),
            &mut self.ids,
            now,
        )
    }

    /// Jumps to the SBAR view with `patient_id` preselected.
    pub fn new_sbar(&mut self, patient_id: &RecordId) -> WardResult<()> {
        self.roster.require(patient_id)?;
        self.shell.new_sbar(patient_id.clone());
        self.sbar.select_patient(Some(patient_id.clone()));
        Ok(())
    }

    /// Files the SBAR draft under the shift covering `now` and the configured nurse.
    pub fn submit_sbar(&mut self, now: DateTime<Utc>) -> WardResult<&SbarRecord> {
        let now = self.observe(now);
        let shift = self.shift_at(now);
        self.sbar
            .submit(shift, self.config.nurse_name(), &mut self.ids, now)
    }

    /// Files a complete note for a roster patient, or the selected one, leaving the SBAR
    /// view's draft as it is.
    pub fn file_sbar(
        &mut self,
        patient_id: Option<RecordId>,
        note: SbarDraft,
        now: DateTime<Utc>,
    ) -> WardResult<&SbarRecord> {
        if let Some(patient_id) = &patient_id {
            self.roster.require(patient_id)?;
        }
        let now = self.observe(now);
        let shift = self.shift_at(now);
        self.sbar.file(
            patient_id,
            note,
            shift,
            self.config.nurse_name(),
            &mut self.ids,
            now,
        )
    }

    /// Imports a scale file, rejecting beds that are not on the roster.
    pub fn import_scale<R: Read>(
        &mut self,
        file_name: &str,
        reader: R,
        now: DateTime<Utc>,
    ) -> ImportResult<&ImportReport> {
        let now = self.observe(now);
        self.scale
            .import_reader(file_name, reader, Some(&self.roster), &mut self.ids, now)
    }

    pub fn import_scale_file(&mut self, path: &Path, now: DateTime<Utc>) -> ImportResult<&ImportReport> {
        let now = self.observe(now);
        self.scale
            .import_path(path, Some(&self.roster), &mut self.ids, now)
    }

    /// Opens the checklist of a roster patient. Date and shift default to the local date and
    /// the shift at `now`.
    pub fn checklist_form(
        &self,
        patient_id: &RecordId,
        date: Option<NaiveDate>,
        shift: Option<Shift>,
        now: DateTime<Utc>,
    ) -> WardResult<ChecklistForm> {
        self.roster.require(patient_id)?;
        let key = ChecklistKey {
            patient_id: patient_id.clone(),
            date: date.unwrap_or_else(|| local_date(now, self.config.utc_offset())),
            shift: shift.unwrap_or_else(|| self.shift_at(now)),
        };
        Ok(ChecklistForm::open(
            &self.checklists,
            key,
            self.config.nurse_name(),
            now,
        ))
    }

    pub fn save_checklist(&mut self, form: &ChecklistForm, now: DateTime<Utc>) -> &IndicatorChecklist {
        let now = self.observe(now);
        form.save(&mut self.checklists, self.config.nurse_name(), now)
    }

    pub fn assessments_for<'a>(
        &'a self,
        patient_id: &'a RecordId,
    ) -> impl Iterator<Item = &'a PhysicalAssessment> + 'a {
        self.assessments
            .iter()
            .filter(move |a| &a.record.patient_id == patient_id)
    }

    /// Opens the assessment form of a roster patient with their saved assessments.
    pub fn assessment_form(
        &self,
        patient_id: &RecordId,
        now: DateTime<Utc>,
    ) -> WardResult<AssessmentForm> {
        self.roster.require(patient_id)?;
        Ok(AssessmentForm::new(
            patient_id.clone(),
            self.config.nurse_name(),
            self.local_time(now),
            self.assessments_for(patient_id).cloned().collect(),
        ))
    }

    /// Writes the form's assessment list back, replacing that patient's entries.
    pub fn close_assessment_form(&mut self, form: AssessmentForm) {
        let patient_id = form.patient_id().clone();
        let mut list = form.into_assessments();
        self.assessments
            .retain(|a| a.record.patient_id != patient_id);
        list.append(&mut self.assessments);
        self.assessments = list;
    }

    pub fn ids_mut(&mut self) -> &mut TimestampIdGenerator {
        &mut self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvValues;
    use crate::filter::Filter;
    use crate::forms::PatientUpdate;
    use crate::model::{PatientStatus, TaskStatus};
    use crate::navigation::Tab;
    use crate::roster::RosterFilter;
    use crate::sbar::SbarField;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 20, 16, 0, 0).unwrap()
    }

    fn ward() -> Ward {
        ward_with(EnvValues::default())
    }

    fn ward_with(values: EnvValues) -> Ward {
        let config = CoreConfig::from_env_values(values).unwrap();
        Ward::seeded(Arc::new(config), now()).unwrap()
    }

    fn brasilia_ward() -> Ward {
        ward_with(EnvValues {
            utc_offset: Some("-03:00".into()),
            ..EnvValues::default()
        })
    }

    fn id(raw: &str) -> RecordId {
        RecordId::parse(raw).unwrap()
    }

    #[test]
    fn joao_silva_scenario() {
        let mut ward = ward();
        let by_bed = RosterFilter {
            search: "101".into(),
            ..RosterFilter::default()
        };
        let found = ward.roster().filter(&by_bed);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].patient.name, "João Silva");
        assert_eq!(found[0].patient.status, PatientStatus::Critical);

        let stable = RosterFilter {
            status: Filter::Only(PatientStatus::Stable),
            ..RosterFilter::default()
        };
        assert!(ward
            .roster()
            .filter(&stable)
            .iter()
            .all(|p| p.patient.name != "João Silva"));

        let mut form = ward.patient_form(Some(&id("1")), now()).unwrap();
        form.update(PatientUpdate::BedNumber("101A".into()));
        assert_eq!(
            ward.save_patient(&mut form, now()),
            SubmitOutcome::Saved(id("1"))
        );
        assert_eq!(ward.roster().len(), 6);
        assert_eq!(ward.roster().require(&id("1")).unwrap().patient.bed_number, "101A");
    }

    #[test]
    fn tick_refreshes_decubitus_timers() {
        let mut ward = ward();
        ward.tick(now() + Duration::minutes(5));
        let joao = &ward.roster().require(&id("1")).unwrap().patient;
        assert_eq!(joao.decubitus_timer, 90);

        ward.reset_turn(&id("1"), now() + Duration::minutes(5)).unwrap();
        ward.tick(now() + Duration::minutes(20));
        let joao = &ward.roster().require(&id("1")).unwrap().patient;
        assert_eq!(joao.decubitus_timer, 15);
    }

    #[test]
    fn tasks_need_a_roster_patient() {
        let mut ward = ward();
        let task = ward.add_task(&id("4"), now()).unwrap();
        assert_eq!(task.assigned_to, "Enfermeiro João");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(ward.add_task(&id("404"), now()).is_err());
        assert_eq!(ward.dashboard().tasks().len(), 3);
    }

    #[test]
    fn new_sbar_from_dashboard_files_under_current_shift() {
        let mut ward = ward();
        ward.new_sbar(&id("3")).unwrap();
        assert_eq!(ward.shell().active(), Tab::Sbar);
        ward.sbar_mut().edit(SbarField::Situation, "Rebaixamento de consciência");
        let record = ward.submit_sbar(now()).unwrap();
        assert_eq!(record.patient_id, id("3"));
        assert_eq!(record.shift, Shift::Afternoon);
        assert_eq!(record.created_by, "Enfermeiro João");
    }

    #[test]
    fn rejected_note_keeps_the_draft() {
        let mut ward = ward();
        ward.sbar_mut().edit(SbarField::Assessment, "Instável");
        let note = SbarDraft::default().with(SbarField::Situation, "Queda");
        assert!(ward.file_sbar(None, note.clone(), now()).is_err());
        assert!(ward.file_sbar(Some(id("404")), note.clone(), now()).is_err());
        assert_eq!(ward.sbar().draft().assessment, "Instável");

        let record = ward.file_sbar(Some(id("5")), note, now()).unwrap();
        assert_eq!(record.situation, "Queda");
        assert_eq!(ward.sbar().draft().assessment, "Instável");
        assert_eq!(ward.sbar().records().len(), 2);
    }

    #[test]
    fn import_checks_beds_against_roster() {
        let mut ward = ward();
        let body = "Técnico,Paciente,Data,Turno,Leito\nAna Costa,Pedro Lima,2024-01-21,night,999\n";
        let report = ward
            .import_scale("escala.csv", body.as_bytes(), now())
            .unwrap();
        assert_eq!(report.errors, vec!["Linha 2: Leito não existe"]);
    }

    #[test]
    fn checklist_defaults_to_today_and_current_shift() {
        let mut ward = ward();
        let form = ward.checklist_form(&id("1"), None, None, now()).unwrap();
        assert_eq!(form.checklist().date, now().date_naive());
        assert_eq!(form.checklist().shift, Shift::Afternoon);
        ward.save_checklist(&form, now());
        assert_eq!(ward.checklists().len(), 1);
    }

    #[test]
    fn assessments_round_trip_through_the_form() {
        let mut ward = ward();
        let mut form = ward.assessment_form(&id("1"), now()).unwrap();
        assert_eq!(form.assessments().len(), 1);
        let local = ward.local_time(now());
        form.save(ward.ids_mut(), local).unwrap();
        ward.close_assessment_form(form);
        assert_eq!(ward.assessments_for(&id("1")).count(), 2);
        assert_eq!(ward.assessments_for(&id("2")).count(), 0);
    }

    #[test]
    fn events_carry_their_own_instant_while_the_clock_idles() {
        let mut ward = ward();
        let later = now() + Duration::seconds(90);

        let joao = ward.reset_turn(&id("1"), later).unwrap();
        assert_eq!(joao.last_turn, later);
        assert_eq!(joao.decubitus_timer, 0);

        let task = ward.add_task(&id("2"), later).unwrap();
        assert_eq!(task.created_at, later);

        ward.sbar_mut().select_patient(Some(id("2")));
        ward.sbar_mut().edit(SbarField::Situation, "Dispneia");
        let record = ward.submit_sbar(later).unwrap();
        assert_eq!(record.created_at, later);
        assert_eq!(ward.now(), later);
    }

    #[test]
    fn local_offset_sets_shift_and_date() {
        // 14:00 UTC is 11:00 in Brasília; 01:30 UTC on the 21st is still the 20th there.
        let mut ward = brasilia_ward();
        let morning = Utc.with_ymd_and_hms(2024, 1, 20, 14, 0, 0).unwrap();
        ward.new_sbar(&id("3")).unwrap();
        ward.sbar_mut().edit(SbarField::Situation, "Febre");
        assert_eq!(ward.submit_sbar(morning).unwrap().shift, Shift::Morning);

        let late = Utc.with_ymd_and_hms(2024, 1, 21, 1, 30, 0).unwrap();
        let form = ward.checklist_form(&id("1"), None, None, late).unwrap();
        assert_eq!(
            form.checklist().date,
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
        );
        assert_eq!(form.checklist().shift, Shift::Night);

        let assessment = ward.assessment_form(&id("1"), late).unwrap();
        assert_eq!(assessment.draft().date.to_string(), "2024-01-20");
    }
}

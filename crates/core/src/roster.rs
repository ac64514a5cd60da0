//! The ward roster: every admitted patient with their clinical detail.

use crate::filter::Filter;
use crate::model::{Patient, PatientDetail, PatientStatus};
use crate::{WardError, WardResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uti_ids::RecordId;

/// Active predicates of the patient list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterFilter {
    /// Case-insensitive substring over name, bed and diagnosis. Empty matches everything.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: Filter<PatientStatus>,
}

impl RosterFilter {
    pub fn matches(&self, patient: &Patient) -> bool {
        self.status.matches(&patient.status) && patient.matches_search(&self.search)
    }
}

/// Patient counts by status, over the whole roster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub critical: usize,
    pub stable: usize,
    pub recovering: usize,
}

/// Why a filtered list came back empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyHint {
    /// Patients exist but none satisfy the active filters.
    NoMatches,
    /// Nobody is on the roster.
    NoPatients,
}

impl EmptyHint {
    pub fn message(self) -> &'static str {
        match self {
            EmptyHint::NoMatches => "Tente ajustar os filtros de busca",
            EmptyHint::NoPatients => "Nenhum paciente cadastrado",
        }
    }
}

/// Result of [`Roster::save`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

#[derive(Clone, Debug, Default)]
pub struct Roster {
    patients: Vec<PatientDetail>,
}

impl Roster {
    pub fn new(patients: Vec<PatientDetail>) -> Self {
        Self { patients }
    }

    pub fn all(&self) -> &[PatientDetail] {
        &self.patients
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&PatientDetail> {
        self.patients.iter().find(|p| p.id() == id)
    }

    /// Like [`Roster::get`] but an unknown id is an error.
    pub fn require(&self, id: &RecordId) -> WardResult<&PatientDetail> {
        self.get(id).ok_or_else(|| WardError::not_found("patient", id))
    }

    fn require_mut(&mut self, id: &RecordId) -> WardResult<&mut PatientDetail> {
        self.patients
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| WardError::not_found("patient", id))
    }

    pub fn find_by_bed(&self, bed: &str) -> Option<&PatientDetail> {
        let bed = bed.trim();
        self.patients.iter().find(|p| p.patient.bed_number == bed)
    }

    /// Patients satisfying every active predicate, in roster order.
    pub fn filter(&self, filter: &RosterFilter) -> Vec<&PatientDetail> {
        self.patients
            .iter()
            .filter(|p| filter.matches(&p.patient))
            .collect()
    }

    /// Hint to show when `filter` yields nothing; `None` when it yields something.
    pub fn empty_hint(&self, filter: &RosterFilter) -> Option<EmptyHint> {
        if self.patients.is_empty() {
            return Some(EmptyHint::NoPatients);
        }
        if self.patients.iter().any(|p| filter.matches(&p.patient)) {
            None
        } else {
            Some(EmptyHint::NoMatches)
        }
    }

    pub fn counts(&self) -> StatusCounts {
        self.patients
            .iter()
            .fold(StatusCounts::default(), |mut acc, p| {
                acc.total += 1;
                match p.patient.status {
                    PatientStatus::Critical => acc.critical += 1,
                    PatientStatus::Stable => acc.stable += 1,
                    PatientStatus::Recovering => acc.recovering += 1,
                }
                acc
            })
    }

    /// Inserts a new patient or replaces the one with the same id in place.
    pub fn save(&mut self, detail: PatientDetail) -> SaveOutcome {
        match self.patients.iter_mut().find(|p| p.id() == detail.id()) {
            Some(existing) => {
                tracing::info!(patient_id = %detail.id(), "updating patient");
                *existing = detail;
                SaveOutcome::Updated
            }
            None => {
                tracing::info!(patient_id = %detail.id(), "adding patient");
                self.patients.push(detail);
                SaveOutcome::Created
            }
        }
    }

    /// Records a position change for the patient at `now`.
    pub fn reset_turn(&mut self, id: &RecordId, now: DateTime<Utc>) -> WardResult<&Patient> {
        let detail = self.require_mut(id)?;
        detail.patient.reset_turn(now);
        tracing::info!(patient_id = %id, "decubitus timer reset");
        Ok(&detail.patient)
    }

    /// Re-derives every stored decubitus timer from its last turn.
    pub fn refresh_timers(&mut self, now: DateTime<Utc>) {
        for detail in &mut self.patients {
            detail.patient.refresh_timer(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 20, 16, 0, 0).unwrap()
    }

    fn roster() -> Roster {
        Roster::new(seed(now()).unwrap().patients)
    }

    fn names(list: &[&PatientDetail]) -> Vec<String> {
        list.iter().map(|p| p.patient.name.clone()).collect()
    }

    #[test]
    fn status_filter_includes_and_excludes() {
        let roster = roster();
        let critical = RosterFilter {
            status: Filter::Only(PatientStatus::Critical),
            ..RosterFilter::default()
        };
        let stable = RosterFilter {
            status: Filter::Only(PatientStatus::Stable),
            ..RosterFilter::default()
        };
        assert!(names(&roster.filter(&critical)).contains(&"João Silva".to_string()));
        assert!(!names(&roster.filter(&stable)).contains(&"João Silva".to_string()));
    }

    #[test]
    fn search_and_status_combine_preserving_order() {
        let roster = roster();
        let filter = RosterFilter {
            search: "pneumonia".into(),
            status: Filter::Only(PatientStatus::Critical),
        };
        assert_eq!(
            names(&roster.filter(&filter)),
            vec!["João Silva", "Lucia Ferreira"]
        );
    }

    #[test]
    fn counts_cover_unfiltered_roster() {
        let counts = roster().counts();
        assert_eq!(
            counts,
            StatusCounts {
                total: 6,
                critical: 3,
                stable: 2,
                recovering: 1
            }
        );
    }

    #[test]
    fn empty_hint_distinguishes_causes() {
        let roster = roster();
        let none = RosterFilter {
            search: "xyz".into(),
            ..RosterFilter::default()
        };
        assert_eq!(roster.empty_hint(&none), Some(EmptyHint::NoMatches));
        assert_eq!(roster.empty_hint(&RosterFilter::default()), None);
        assert_eq!(
            Roster::default().empty_hint(&RosterFilter::default()),
            Some(EmptyHint::NoPatients)
        );
    }

    #[test]
    fn save_updates_in_place_or_appends() {
        let mut roster = roster();
        let mut joao = roster.get(&RecordId::parse("1").unwrap()).unwrap().clone();
        joao.patient.bed_number = "101A".into();
        assert_eq!(roster.save(joao), SaveOutcome::Updated);
        assert_eq!(roster.len(), 6);
        assert_eq!(roster.all()[0].patient.bed_number, "101A");

        let mut new = roster.all()[1].clone();
        new.patient.id = RecordId::parse("99").unwrap();
        assert_eq!(roster.save(new), SaveOutcome::Created);
        assert_eq!(roster.len(), 7);
        assert_eq!(roster.all()[6].id().as_str(), "99");
    }

    #[test]
    fn reset_turn_zeroes_and_stamps_together() {
        let mut roster = roster();
        let id = RecordId::parse("3").unwrap();
        let later = now() + Duration::minutes(10);
        let patient = roster.reset_turn(&id, later).unwrap();
        assert_eq!(patient.decubitus_timer, 0);
        assert_eq!(patient.last_turn, later);

        roster.refresh_timers(later + Duration::minutes(30));
        assert_eq!(roster.require(&id).unwrap().patient.decubitus_timer, 30);
    }

    #[test]
    fn unknown_patient_is_not_found() {
        let mut roster = roster();
        let id = RecordId::parse("404").unwrap();
        assert!(matches!(
            roster.reset_turn(&id, now()),
            Err(WardError::NotFound { kind: "patient", .. })
        ));
    }
}

//! Per-shift quality-indicator checklist.
//!
//! A checklist is filled for one patient, one date and one shift. It has nine sections; each
//! records whether an event occurred, which of its kinds/causes/locations apply, and an optional
//! date and note. Clearing `occurred` hides the detail in the form but keeps every flag as it
//! was, so ticking it again restores what was entered.

use crate::model::Shift;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uti_ids::RecordId;

/// A fixed set of independent yes/no flags.
pub trait FlagSet: Clone + Default + PartialEq + Serialize + DeserializeOwned {
    type Flag: Copy;

    fn get(&self, flag: Self::Flag) -> bool;
    fn set(&mut self, flag: Self::Flag, value: bool);
    fn any(&self) -> bool;
}

macro_rules! flag_set {
    ($(#[$doc:meta])* $set:ident, $flag:ident { $($field:ident => $variant:ident),+ $(,)? }) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum $flag {
            $($variant),+
        }

        $(#[$doc])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $set {
            $(pub $field: bool),+
        }

        impl FlagSet for $set {
            type Flag = $flag;

            fn get(&self, flag: $flag) -> bool {
                match flag {
                    $($flag::$variant => self.$field),+
                }
            }

            fn set(&mut self, flag: $flag, value: bool) {
                match flag {
                    $($flag::$variant => self.$field = value),+
                }
            }

            fn any(&self) -> bool {
                false $(|| self.$field)+
            }
        }
    };
}

flag_set!(
    /// Where the patient fell from.
    FallTypes, FallType {
        own_height => OwnHeight,
        bed => Bed,
        chair => Chair,
        stretcher => Stretcher,
        lap => Lap,
        crib => Crib,
    }
);

flag_set!(
    /// Pressure-injury sites.
    LppLocations, LppLocation {
        sacrococcygeal => Sacrococcygeal,
        heel => Heel,
        occipital => Occipital,
        trochanteric => Trochanteric,
        nasal_septum => NasalSeptum,
        ear => Ear,
    }
);

flag_set!(
    SkinLesionTypes, SkinLesionType {
        adhesive => Adhesive,
        oximetry => Oximetry,
        diaper => Diaper,
        extravasation => Extravasation,
        burns => Burns,
    }
);

flag_set!(
    /// Causes of an accidental extubation or tube displacement.
    DisplacementCauses, DisplacementCause {
        fixation_displaced => FixationDisplaced,
        manipulation => Manipulation,
        agitation => Agitation,
    }
);

flag_set!(
    CvcLossCauses, CvcLossCause {
        fixation_displaced => FixationDisplaced,
        manipulation => Manipulation,
        agitation => Agitation,
        obstruction => Obstruction,
        traction => Traction,
    }
);

flag_set!(
    /// Kinds of medication error, used both for errors and for near misses.
    MedicationErrorTypes, MedicationErrorType {
        wrong_patient => WrongPatient,
        wrong_drug => WrongDrug,
        wrong_dose => WrongDose,
        wrong_route => WrongRoute,
        wrong_dilution => WrongDilution,
        wrong_time => WrongTime,
        allergy_ignored => AllergyIgnored,
    }
);

/// Fields every checklist section has.
trait Occurrence {
    fn occurred_mut(&mut self) -> &mut bool;
    fn date_mut(&mut self) -> &mut Option<NaiveDate>;
    fn observations_mut(&mut self) -> &mut Option<String>;
}

/// A checklist section with a flag set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section<F> {
    pub occurred: bool,
    pub flags: F,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

impl<F> Occurrence for Section<F> {
    fn occurred_mut(&mut self) -> &mut bool {
        &mut self.occurred
    }
    fn date_mut(&mut self) -> &mut Option<NaiveDate> {
        &mut self.date
    }
    fn observations_mut(&mut self) -> &mut Option<String> {
        &mut self.observations
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhlebitisSeverity {
    Grade1,
    Grade2,
    Grade3,
}

/// Phlebitis records a severity grade instead of flags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhlebitisSection {
    pub occurred: bool,
    pub severity: Option<PhlebitisSeverity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

impl Occurrence for PhlebitisSection {
    fn occurred_mut(&mut self) -> &mut bool {
        &mut self.occurred
    }
    fn date_mut(&mut self) -> &mut Option<NaiveDate> {
        &mut self.date
    }
    fn observations_mut(&mut self) -> &mut Option<String> {
        &mut self.observations
    }
}

/// The nine sections of a checklist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChecklistSection {
    Falls,
    Lpp,
    Phlebitis,
    SkinLesions,
    Extubation,
    TubeDisplacement,
    CvcLoss,
    MedicationErrors,
    NearMisses,
}

impl ChecklistSection {
    pub const ALL: [ChecklistSection; 9] = [
        ChecklistSection::Falls,
        ChecklistSection::Lpp,
        ChecklistSection::Phlebitis,
        ChecklistSection::SkinLesions,
        ChecklistSection::Extubation,
        ChecklistSection::TubeDisplacement,
        ChecklistSection::CvcLoss,
        ChecklistSection::MedicationErrors,
        ChecklistSection::NearMisses,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChecklistSection::Falls => "Quedas",
            ChecklistSection::Lpp => "Lesão por Pressão (LPP)",
            ChecklistSection::Phlebitis => "Flebite",
            ChecklistSection::SkinLesions => "Lesões de Pele",
            ChecklistSection::Extubation => "Extubação Acidental",
            ChecklistSection::TubeDisplacement => "Deslocamento de Sonda",
            ChecklistSection::CvcLoss => "Perda de CVC",
            ChecklistSection::MedicationErrors => "Erros de Medicação",
            ChecklistSection::NearMisses => "Quase Erros (Near Miss)",
        }
    }
}

/// A flag addressed by its section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "section", content = "flag", rename_all = "camelCase")]
pub enum ChecklistFlag {
    Falls(FallType),
    Lpp(LppLocation),
    SkinLesions(SkinLesionType),
    Extubation(DisplacementCause),
    TubeDisplacement(DisplacementCause),
    CvcLoss(CvcLossCause),
    MedicationErrors(MedicationErrorType),
    NearMisses(MedicationErrorType),
}

/// A single edit of a checklist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChecklistUpdate {
    Occurred {
        section: ChecklistSection,
        value: bool,
    },
    Flag {
        flag: ChecklistFlag,
        value: bool,
    },
    Date {
        section: ChecklistSection,
        value: Option<NaiveDate>,
    },
    Observations {
        section: ChecklistSection,
        value: Option<String>,
    },
    PhlebitisSeverity {
        value: Option<PhlebitisSeverity>,
    },
    GeneralObservations {
        value: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorChecklist {
    pub patient_id: RecordId,
    pub date: NaiveDate,
    pub shift: Shift,
    pub falls: Section<FallTypes>,
    pub lpp: Section<LppLocations>,
    pub phlebitis: PhlebitisSection,
    pub skin_lesions: Section<SkinLesionTypes>,
    pub extubation: Section<DisplacementCauses>,
    pub tube_displacement: Section<DisplacementCauses>,
    pub cvc_loss: Section<CvcLossCauses>,
    pub medication_errors: Section<MedicationErrorTypes>,
    pub near_misses: Section<MedicationErrorTypes>,
    pub observations: String,
    pub completed_by: String,
    pub completed_at: DateTime<Utc>,
}

impl IndicatorChecklist {
    /// An empty checklist: nothing occurred, no flags set.
    pub fn blank(
        patient_id: RecordId,
        date: NaiveDate,
        shift: Shift,
        completed_by: impl Into<String>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            patient_id,
            date,
            shift,
            falls: Section::default(),
            lpp: Section::default(),
            phlebitis: PhlebitisSection::default(),
            skin_lesions: Section::default(),
            extubation: Section::default(),
            tube_displacement: Section::default(),
            cvc_loss: Section::default(),
            medication_errors: Section::default(),
            near_misses: Section::default(),
            observations: String::new(),
            completed_by: completed_by.into(),
            completed_at,
        }
    }

    pub fn key(&self) -> ChecklistKey {
        ChecklistKey {
            patient_id: self.patient_id.clone(),
            date: self.date,
            shift: self.shift,
        }
    }

    fn section_mut(&mut self, section: ChecklistSection) -> &mut dyn Occurrence {
        match section {
            ChecklistSection::Falls => &mut self.falls,
            ChecklistSection::Lpp => &mut self.lpp,
            ChecklistSection::Phlebitis => &mut self.phlebitis,
            ChecklistSection::SkinLesions => &mut self.skin_lesions,
            ChecklistSection::Extubation => &mut self.extubation,
            ChecklistSection::TubeDisplacement => &mut self.tube_displacement,
            ChecklistSection::CvcLoss => &mut self.cvc_loss,
            ChecklistSection::MedicationErrors => &mut self.medication_errors,
            ChecklistSection::NearMisses => &mut self.near_misses,
        }
    }

    pub fn occurred(&self, section: ChecklistSection) -> bool {
        match section {
            ChecklistSection::Falls => self.falls.occurred,
            ChecklistSection::Lpp => self.lpp.occurred,
            ChecklistSection::Phlebitis => self.phlebitis.occurred,
            ChecklistSection::SkinLesions => self.skin_lesions.occurred,
            ChecklistSection::Extubation => self.extubation.occurred,
            ChecklistSection::TubeDisplacement => self.tube_displacement.occurred,
            ChecklistSection::CvcLoss => self.cvc_loss.occurred,
            ChecklistSection::MedicationErrors => self.medication_errors.occurred,
            ChecklistSection::NearMisses => self.near_misses.occurred,
        }
    }

    /// Sections whose `occurred` gate is set, in display order.
    pub fn occurrences(&self) -> Vec<ChecklistSection> {
        ChecklistSection::ALL
            .into_iter()
            .filter(|s| self.occurred(*s))
            .collect()
    }

    pub fn flag(&self, flag: ChecklistFlag) -> bool {
        match flag {
            ChecklistFlag::Falls(f) => self.falls.flags.get(f),
            ChecklistFlag::Lpp(f) => self.lpp.flags.get(f),
            ChecklistFlag::SkinLesions(f) => self.skin_lesions.flags.get(f),
            ChecklistFlag::Extubation(f) => self.extubation.flags.get(f),
            ChecklistFlag::TubeDisplacement(f) => self.tube_displacement.flags.get(f),
            ChecklistFlag::CvcLoss(f) => self.cvc_loss.flags.get(f),
            ChecklistFlag::MedicationErrors(f) => self.medication_errors.flags.get(f),
            ChecklistFlag::NearMisses(f) => self.near_misses.flags.get(f),
        }
    }

    /// Sets the `occurred` gate of a section. Flags are left untouched either way.
    pub fn with_occurred(mut self, section: ChecklistSection, value: bool) -> Self {
        *self.section_mut(section).occurred_mut() = value;
        self
    }

    pub fn with_flag(mut self, flag: ChecklistFlag, value: bool) -> Self {
        match flag {
            ChecklistFlag::Falls(f) => self.falls.flags.set(f, value),
            ChecklistFlag::Lpp(f) => self.lpp.flags.set(f, value),
            ChecklistFlag::SkinLesions(f) => self.skin_lesions.flags.set(f, value),
            ChecklistFlag::Extubation(f) => self.extubation.flags.set(f, value),
            ChecklistFlag::TubeDisplacement(f) => self.tube_displacement.flags.set(f, value),
            ChecklistFlag::CvcLoss(f) => self.cvc_loss.flags.set(f, value),
            ChecklistFlag::MedicationErrors(f) => self.medication_errors.flags.set(f, value),
            ChecklistFlag::NearMisses(f) => self.near_misses.flags.set(f, value),
        }
        self
    }

    pub fn with_date(mut self, section: ChecklistSection, date: Option<NaiveDate>) -> Self {
        *self.section_mut(section).date_mut() = date;
        self
    }

    pub fn with_observations(mut self, section: ChecklistSection, text: Option<String>) -> Self {
        *self.section_mut(section).observations_mut() = text;
        self
    }

    pub fn with_phlebitis_severity(mut self, severity: Option<PhlebitisSeverity>) -> Self {
        self.phlebitis.severity = severity;
        self
    }

    pub fn apply(self, update: ChecklistUpdate) -> Self {
        match update {
            ChecklistUpdate::Occurred { section, value } => self.with_occurred(section, value),
            ChecklistUpdate::Flag { flag, value } => self.with_flag(flag, value),
            ChecklistUpdate::Date { section, value } => self.with_date(section, value),
            ChecklistUpdate::Observations { section, value } => {
                self.with_observations(section, value)
            }
            ChecklistUpdate::PhlebitisSeverity { value } => self.with_phlebitis_severity(value),
            ChecklistUpdate::GeneralObservations { value } => Self {
                observations: value,
                ..self
            },
        }
    }
}

/// Identity of a checklist: one per patient, date and shift.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChecklistKey {
    pub patient_id: RecordId,
    pub date: NaiveDate,
    pub shift: Shift,
}

/// Saved checklists.
#[derive(Clone, Debug, Default)]
pub struct ChecklistBook {
    saved: BTreeMap<ChecklistKey, IndicatorChecklist>,
}

impl ChecklistBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ChecklistKey) -> Option<&IndicatorChecklist> {
        self.saved.get(key)
    }

    /// Stores `checklist`, replacing any earlier save for the same key.
    pub fn save(&mut self, checklist: IndicatorChecklist) -> &IndicatorChecklist {
        let key = checklist.key();
        tracing::info!(
            patient_id = %key.patient_id,
            date = %key.date,
            shift = %key.shift,
            occurrences = checklist.occurrences().len(),
            "saving indicator checklist"
        );
        self.saved.insert(key.clone(), checklist);
        &self.saved[&key]
    }

    /// All checklists saved for a patient, oldest first.
    pub fn for_patient<'a>(
        &'a self,
        patient_id: &'a RecordId,
    ) -> impl Iterator<Item = &'a IndicatorChecklist> + 'a {
        self.saved
            .values()
            .filter(move |c| &c.patient_id == patient_id)
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}

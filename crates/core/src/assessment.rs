//! Bedside physical assessment, one sub-record per body system.

use crate::model::{hh_mm, wire_enum};
use crate::validation::ValidationErrors;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uti_ids::RecordId;

pub const GLASGOW_RANGE: std::ops::RangeInclusive<u8> = 3..=15;
pub const RASS_RANGE: std::ops::RangeInclusive<i8> = -5..=4;
pub const PAIN_RANGE: std::ops::RangeInclusive<u8> = 0..=10;

macro_rules! vocabulary {
    ($ty:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $ty {
            $($variant),+
        }

        wire_enum!($ty { $($variant => $wire),+ });
    };
}

vocabulary!(ConsciousnessLevel { Alert => "alert", Decreased => "decreased", Sedated => "sedated" });
vocabulary!(Pupils { Isocoric => "isocoric", Anisocoric => "anisocoric" });
vocabulary!(RespiratoryPattern { Normal => "normal", Altered => "altered" });
vocabulary!(HeartRhythm { Regular => "regular", Irregular => "irregular" });
vocabulary!(Presence { Present => "present", Diminished => "diminished", Absent => "absent" });
vocabulary!(CapillaryRefill { Normal => "normal", Delayed => "delayed" });
vocabulary!(Abdomen { Soft => "soft", Distended => "distended", Rigid => "rigid" });
vocabulary!(Feeding {
    Oral => "oral",
    Enteral => "enteral",
    Parenteral => "parenteral",
    Fasting => "fasting",
});
vocabulary!(SkinColor {
    Normal => "normal",
    Pale => "pale",
    Cyanotic => "cyanotic",
    Jaundiced => "jaundiced",
});
vocabulary!(SkinTemperature { Normal => "normal", Cold => "cold", Warm => "warm" });
vocabulary!(SkinTurgor { Normal => "normal", Decreased => "decreased" });
vocabulary!(Mobility { Independent => "independent", Assisted => "assisted", Bedridden => "bedridden" });
vocabulary!(JointMovement { Normal => "normal", Limited => "limited" });

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Neurological {
    pub consciousness_level: ConsciousnessLevel,
    pub glasgow_scale: u8,
    pub rass_scale: i8,
    pub pupils: Pupils,
    pub motor_response: String,
    pub observations: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum NeurologicalField {
    ConsciousnessLevel(ConsciousnessLevel),
    GlasgowScale(u8),
    RassScale(i8),
    Pupils(Pupils),
    MotorResponse(String),
    Observations(String),
}

impl Neurological {
    pub fn apply(self, field: NeurologicalField) -> Self {
        match field {
            NeurologicalField::ConsciousnessLevel(consciousness_level) => Self {
                consciousness_level,
                ..self
            },
            NeurologicalField::GlasgowScale(glasgow_scale) => Self {
                glasgow_scale,
                ..self
            },
            NeurologicalField::RassScale(rass_scale) => Self { rass_scale, ..self },
            NeurologicalField::Pupils(pupils) => Self { pupils, ..self },
            NeurologicalField::MotorResponse(motor_response) => Self {
                motor_response,
                ..self
            },
            NeurologicalField::Observations(observations) => Self {
                observations,
                ..self
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Respiratory {
    pub respiratory_pattern: RespiratoryPattern,
    pub oxygen_use: bool,
    pub oxygen_flow: String,
    pub secretion_presence: bool,
    pub secretion_characteristics: String,
    pub breath_sounds: String,
    pub observations: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum RespiratoryField {
    RespiratoryPattern(RespiratoryPattern),
    OxygenUse(bool),
    OxygenFlow(String),
    SecretionPresence(bool),
    SecretionCharacteristics(String),
    BreathSounds(String),
    Observations(String),
}

impl Respiratory {
    pub fn apply(self, field: RespiratoryField) -> Self {
        match field {
            RespiratoryField::RespiratoryPattern(respiratory_pattern) => Self {
                respiratory_pattern,
                ..self
            },
            RespiratoryField::OxygenUse(oxygen_use) => Self { oxygen_use, ..self },
            RespiratoryField::OxygenFlow(oxygen_flow) => Self {
                oxygen_flow,
                ..self
            },
            RespiratoryField::SecretionPresence(secretion_presence) => Self {
                secretion_presence,
                ..self
            },
            RespiratoryField::SecretionCharacteristics(secretion_characteristics) => Self {
                secretion_characteristics,
                ..self
            },
            RespiratoryField::BreathSounds(breath_sounds) => Self {
                breath_sounds,
                ..self
            },
            RespiratoryField::Observations(observations) => Self {
                observations,
                ..self
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cardiovascular {
    pub heart_rate: u16,
    pub blood_pressure: String,
    pub heart_rhythm: HeartRhythm,
    pub peripheral_pulses: Presence,
    pub capillary_refill: CapillaryRefill,
    pub edema: bool,
    pub edema_location: String,
    pub observations: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum CardiovascularField {
    HeartRate(u16),
    BloodPressure(String),
    HeartRhythm(HeartRhythm),
    PeripheralPulses(Presence),
    CapillaryRefill(CapillaryRefill),
    Edema(bool),
    EdemaLocation(String),
    Observations(String),
}

impl Cardiovascular {
    pub fn apply(self, field: CardiovascularField) -> Self {
        match field {
            CardiovascularField::HeartRate(heart_rate) => Self { heart_rate, ..self },
            CardiovascularField::BloodPressure(blood_pressure) => Self {
                blood_pressure,
                ..self
            },
            CardiovascularField::HeartRhythm(heart_rhythm) => Self {
                heart_rhythm,
                ..self
            },
            CardiovascularField::PeripheralPulses(peripheral_pulses) => Self {
                peripheral_pulses,
                ..self
            },
            CardiovascularField::CapillaryRefill(capillary_refill) => Self {
                capillary_refill,
                ..self
            },
            CardiovascularField::Edema(edema) => Self { edema, ..self },
            CardiovascularField::EdemaLocation(edema_location) => Self {
                edema_location,
                ..self
            },
            CardiovascularField::Observations(observations) => Self {
                observations,
                ..self
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gastrointestinal {
    pub abdomen: Abdomen,
    pub bowel_sounds: Presence,
    pub last_evacuation: String,
    pub feeding: Feeding,
    pub nausea: bool,
    pub vomiting: bool,
    pub observations: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum GastrointestinalField {
    Abdomen(Abdomen),
    BowelSounds(Presence),
    LastEvacuation(String),
    Feeding(Feeding),
    Nausea(bool),
    Vomiting(bool),
    Observations(String),
}

impl Gastrointestinal {
    pub fn apply(self, field: GastrointestinalField) -> Self {
        match field {
            GastrointestinalField::Abdomen(abdomen) => Self { abdomen, ..self },
            GastrointestinalField::BowelSounds(bowel_sounds) => Self {
                bowel_sounds,
                ..self
            },
            GastrointestinalField::LastEvacuation(last_evacuation) => Self {
                last_evacuation,
                ..self
            },
            GastrointestinalField::Feeding(feeding) => Self { feeding, ..self },
            GastrointestinalField::Nausea(nausea) => Self { nausea, ..self },
            GastrointestinalField::Vomiting(vomiting) => Self { vomiting, ..self },
            GastrointestinalField::Observations(observations) => Self {
                observations,
                ..self
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genitourinary {
    pub urinary_output: String,
    pub urine_characteristics: String,
    pub bladder_catheter: bool,
    pub catheter_type: String,
    pub observations: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum GenitourinaryField {
    UrinaryOutput(String),
    UrineCharacteristics(String),
    BladderCatheter(bool),
    CatheterType(String),
    Observations(String),
}

impl Genitourinary {
    pub fn apply(self, field: GenitourinaryField) -> Self {
        match field {
            GenitourinaryField::UrinaryOutput(urinary_output) => Self {
                urinary_output,
                ..self
            },
            GenitourinaryField::UrineCharacteristics(urine_characteristics) => Self {
                urine_characteristics,
                ..self
            },
            GenitourinaryField::BladderCatheter(bladder_catheter) => Self {
                bladder_catheter,
                ..self
            },
            GenitourinaryField::CatheterType(catheter_type) => Self {
                catheter_type,
                ..self
            },
            GenitourinaryField::Observations(observations) => Self {
                observations,
                ..self
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integumentary {
    pub skin_color: SkinColor,
    pub skin_temperature: SkinTemperature,
    pub skin_turgor: SkinTurgor,
    pub wounds: bool,
    pub wound_description: String,
    pub pressure_ulcers: bool,
    pub pressure_ulcer_stage: String,
    pub observations: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum IntegumentaryField {
    SkinColor(SkinColor),
    SkinTemperature(SkinTemperature),
    SkinTurgor(SkinTurgor),
    Wounds(bool),
    WoundDescription(String),
    PressureUlcers(bool),
    PressureUlcerStage(String),
    Observations(String),
}

impl Integumentary {
    pub fn apply(self, field: IntegumentaryField) -> Self {
        match field {
            IntegumentaryField::SkinColor(skin_color) => Self { skin_color, ..self },
            IntegumentaryField::SkinTemperature(skin_temperature) => Self {
                skin_temperature,
                ..self
            },
            IntegumentaryField::SkinTurgor(skin_turgor) => Self {
                skin_turgor,
                ..self
            },
            IntegumentaryField::Wounds(wounds) => Self { wounds, ..self },
            IntegumentaryField::WoundDescription(wound_description) => Self {
                wound_description,
                ..self
            },
            IntegumentaryField::PressureUlcers(pressure_ulcers) => Self {
                pressure_ulcers,
                ..self
            },
            IntegumentaryField::PressureUlcerStage(pressure_ulcer_stage) => Self {
                pressure_ulcer_stage,
                ..self
            },
            IntegumentaryField::Observations(observations) => Self {
                observations,
                ..self
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Musculoskeletal {
    pub mobility: Mobility,
    pub muscle_strength: String,
    pub joint_movement: JointMovement,
    pub pain: bool,
    pub pain_scale: u8,
    pub pain_location: String,
    pub observations: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum MusculoskeletalField {
    Mobility(Mobility),
    MuscleStrength(String),
    JointMovement(JointMovement),
    Pain(bool),
    PainScale(u8),
    PainLocation(String),
    Observations(String),
}

impl Musculoskeletal {
    pub fn apply(self, field: MusculoskeletalField) -> Self {
        match field {
            MusculoskeletalField::Mobility(mobility) => Self { mobility, ..self },
            MusculoskeletalField::MuscleStrength(muscle_strength) => Self {
                muscle_strength,
                ..self
            },
            MusculoskeletalField::JointMovement(joint_movement) => Self {
                joint_movement,
                ..self
            },
            MusculoskeletalField::Pain(pain) => Self { pain, ..self },
            MusculoskeletalField::PainScale(pain_scale) => Self { pain_scale, ..self },
            MusculoskeletalField::PainLocation(pain_location) => Self {
                pain_location,
                ..self
            },
            MusculoskeletalField::Observations(observations) => Self {
                observations,
                ..self
            },
        }
    }
}

/// Content of an assessment, everything except its identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub patient_id: RecordId,
    pub date: NaiveDate,
    #[serde(with = "hh_mm")]
    pub time: NaiveTime,
    pub assessed_by: String,
    pub neurological: Neurological,
    pub respiratory: Respiratory,
    pub cardiovascular: Cardiovascular,
    pub gastrointestinal: Gastrointestinal,
    pub genitourinary: Genitourinary,
    pub integumentary: Integumentary,
    pub musculoskeletal: Musculoskeletal,
    pub general_observations: String,
}

/// A saved assessment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalAssessment {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: AssessmentRecord,
}

/// A single edit of an assessment, addressed by body system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "system", content = "change", rename_all = "camelCase")]
pub enum AssessmentUpdate {
    Date(NaiveDate),
    #[serde(with = "hh_mm")]
    Time(NaiveTime),
    AssessedBy(String),
    Neurological(NeurologicalField),
    Respiratory(RespiratoryField),
    Cardiovascular(CardiovascularField),
    Gastrointestinal(GastrointestinalField),
    Genitourinary(GenitourinaryField),
    Integumentary(IntegumentaryField),
    Musculoskeletal(MusculoskeletalField),
    GeneralObservations(String),
}

impl AssessmentRecord {
    /// A fresh assessment with unremarkable findings, dated `now`.
    pub fn template(patient_id: RecordId, assessed_by: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            patient_id,
            date: now.date(),
            time: now.time(),
            assessed_by: assessed_by.into(),
            neurological: Neurological {
                consciousness_level: ConsciousnessLevel::Alert,
                glasgow_scale: 15,
                rass_scale: 0,
                pupils: Pupils::Isocoric,
                motor_response: String::new(),
                observations: String::new(),
            },
            respiratory: Respiratory {
                respiratory_pattern: RespiratoryPattern::Normal,
                oxygen_use: false,
                oxygen_flow: String::new(),
                secretion_presence: false,
                secretion_characteristics: String::new(),
                breath_sounds: String::new(),
                observations: String::new(),
            },
            cardiovascular: Cardiovascular {
                heart_rate: 80,
                blood_pressure: String::new(),
                heart_rhythm: HeartRhythm::Regular,
                peripheral_pulses: Presence::Present,
                capillary_refill: CapillaryRefill::Normal,
                edema: false,
                edema_location: String::new(),
                observations: String::new(),
            },
            gastrointestinal: Gastrointestinal {
                abdomen: Abdomen::Soft,
                bowel_sounds: Presence::Present,
                last_evacuation: String::new(),
                feeding: Feeding::Oral,
                nausea: false,
                vomiting: false,
                observations: String::new(),
            },
            genitourinary: Genitourinary {
                urinary_output: String::new(),
                urine_characteristics: String::new(),
                bladder_catheter: false,
                catheter_type: String::new(),
                observations: String::new(),
            },
            integumentary: Integumentary {
                skin_color: SkinColor::Normal,
                skin_temperature: SkinTemperature::Normal,
                skin_turgor: SkinTurgor::Normal,
                wounds: false,
                wound_description: String::new(),
                pressure_ulcers: false,
                pressure_ulcer_stage: String::new(),
                observations: String::new(),
            },
            musculoskeletal: Musculoskeletal {
                mobility: Mobility::Independent,
                muscle_strength: String::new(),
                joint_movement: JointMovement::Normal,
                pain: false,
                pain_scale: 0,
                pain_location: String::new(),
                observations: String::new(),
            },
            general_observations: String::new(),
        }
    }

    pub fn apply(self, update: AssessmentUpdate) -> Self {
        match update {
            AssessmentUpdate::Date(date) => Self { date, ..self },
            AssessmentUpdate::Time(time) => Self { time, ..self },
            AssessmentUpdate::AssessedBy(assessed_by) => Self {
                assessed_by,
                ..self
            },
            AssessmentUpdate::Neurological(f) => Self {
                neurological: self.neurological.apply(f),
                ..self
            },
            AssessmentUpdate::Respiratory(f) => Self {
                respiratory: self.respiratory.apply(f),
                ..self
            },
            AssessmentUpdate::Cardiovascular(f) => Self {
                cardiovascular: self.cardiovascular.apply(f),
                ..self
            },
            AssessmentUpdate::Gastrointestinal(f) => Self {
                gastrointestinal: self.gastrointestinal.apply(f),
                ..self
            },
            AssessmentUpdate::Genitourinary(f) => Self {
                genitourinary: self.genitourinary.apply(f),
                ..self
            },
            AssessmentUpdate::Integumentary(f) => Self {
                integumentary: self.integumentary.apply(f),
                ..self
            },
            AssessmentUpdate::Musculoskeletal(f) => Self {
                musculoskeletal: self.musculoskeletal.apply(f),
                ..self
            },
            AssessmentUpdate::GeneralObservations(general_observations) => Self {
                general_observations,
                ..self
            },
        }
    }

    /// Range checks on the scored scales. Every violation is reported.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check(
            !GLASGOW_RANGE.contains(&self.neurological.glasgow_scale),
            "neurological.glasgowScale",
            "Escala de Glasgow deve estar entre 3 e 15",
        );
        errors.check(
            !RASS_RANGE.contains(&self.neurological.rass_scale),
            "neurological.rassScale",
            "Escala RASS deve estar entre -5 e +4",
        );
        errors.check(
            !PAIN_RANGE.contains(&self.musculoskeletal.pain_scale),
            "musculoskeletal.painScale",
            "Escala de dor deve estar entre 0 e 10",
        );
        errors
    }
}

//! Seed collections the ward starts with.
//!
//! Nothing on the ward is persisted, so every process starts from this data. Decubitus timers are
//! anchored to the seeding instant: a patient seeded with a 85 minute timer was last turned 85
//! minutes before `now`.

use crate::assessment::{
    Abdomen, AssessmentRecord, CapillaryRefill, Cardiovascular, ConsciousnessLevel, Feeding,
    Gastrointestinal, Genitourinary, HeartRhythm, Integumentary, JointMovement, Mobility,
    Musculoskeletal, Neurological, PhysicalAssessment, Presence, Pupils, Respiratory,
    RespiratoryPattern, SkinColor, SkinTemperature, SkinTurgor,
};
use crate::model::{
    hh_mm, Device, DeviceKind, DeviceStatus, Indicator, IndicatorKind, Medication, MedicationKind,
    Patient, PatientDetail, PatientStatus, SbarRecord, ScaleEntry, Shift, Task, TaskPriority,
    TaskStatus,
};
use crate::{WardError, WardResult};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use uti_ids::RecordId;

/// Everything the ward starts with.
#[derive(Clone, Debug)]
pub struct SeedData {
    pub patients: Vec<PatientDetail>,
    pub tasks: Vec<Task>,
    pub sbar_records: Vec<SbarRecord>,
    pub indicators: Vec<Indicator>,
    pub scale_entries: Vec<ScaleEntry>,
    pub assessments: Vec<PhysicalAssessment>,
}

fn id(raw: &str) -> WardResult<RecordId> {
    Ok(RecordId::parse(raw)?)
}

fn date(raw: &str) -> WardResult<NaiveDate> {
    raw.parse()
        .map_err(|e| WardError::InvalidInput(format!("bad seed date '{raw}': {e}")))
}

fn instant(raw: &str) -> WardResult<DateTime<Utc>> {
    raw.parse()
        .map_err(|e| WardError::InvalidInput(format!("bad seed instant '{raw}': {e}")))
}

fn time(raw: &str) -> WardResult<NaiveTime> {
    hh_mm::parse(raw).map_err(|e| WardError::InvalidInput(format!("bad seed time '{raw}': {e}")))
}

/// Builds the seed collections with decubitus anchors relative to `now`.
pub fn seed(now: DateTime<Utc>) -> WardResult<SeedData> {
    Ok(SeedData {
        patients: patients(now)?,
        tasks: tasks()?,
        sbar_records: vec![current_sbar()?],
        indicators: indicators()?,
        scale_entries: scale_entries()?,
        assessments: assessments()?,
    })
}

fn patients(now: DateTime<Utc>) -> WardResult<Vec<PatientDetail>> {
    let rows: [(&str, &str, u32, &str, &str, &str, PatientStatus, u32); 6] = [
        ("1", "João Silva", 65, "101", "Pneumonia grave", "2024-01-15", PatientStatus::Critical, 85),
        ("2", "Maria Santos", 72, "102", "Pós-operatório cardíaco", "2024-01-18", PatientStatus::Stable, 45),
        ("3", "Carlos Oliveira", 58, "103", "AVC isquêmico", "2024-01-19", PatientStatus::Recovering, 120),
        ("4", "Ana Costa", 45, "104", "Insuficiência respiratória", "2024-01-17", PatientStatus::Critical, 95),
        ("5", "Roberto Lima", 69, "105", "Sepse", "2024-01-16", PatientStatus::Stable, 30),
        ("6", "Lucia Ferreira", 78, "106", "Pneumonia aspirativa", "2024-01-20", PatientStatus::Critical, 75),
    ];

    let mut out = Vec::with_capacity(rows.len());
    for (raw_id, name, age, bed, diagnosis, admitted, status, timer) in rows {
        let patient = Patient {
            id: id(raw_id)?,
            name: name.into(),
            age,
            bed_number: bed.into(),
            diagnosis: diagnosis.into(),
            admission_date: date(admitted)?,
            status,
            decubitus_timer: timer,
            last_turn: now - Duration::minutes(i64::from(timer)),
        };
        let detail = if raw_id == "1" {
            PatientDetail {
                patient,
                medical_record: "2024001234".into(),
                devices: devices()?,
                critical_medications: medications()?,
                current_sbar: Some(current_sbar()?),
            }
        } else {
            PatientDetail {
                patient,
                medical_record: String::new(),
                devices: Vec::new(),
                critical_medications: Vec::new(),
                current_sbar: None,
            }
        };
        out.push(detail);
    }
    Ok(out)
}

fn devices() -> WardResult<Vec<Device>> {
    let rows = [
        ("1", "Tubo Orotraqueal", DeviceKind::Respiratory, "2024-01-15"),
        ("2", "Cateter Venoso Central", DeviceKind::Vascular, "2024-01-16"),
        ("3", "Sonda Nasogástrica", DeviceKind::Drainage, "2024-01-17"),
        ("4", "Dreno Torácico", DeviceKind::Drainage, "2024-01-18"),
    ];
    rows.into_iter()
        .map(|(raw_id, name, kind, inserted)| -> WardResult<Device> {
            Ok(Device {
                id: id(raw_id)?,
                name: name.into(),
                kind,
                status: DeviceStatus::Active,
                insertion_date: date(inserted)?,
            })
        })
        .collect()
}

fn medications() -> WardResult<Vec<Medication>> {
    let rows = [
        ("1", "Noradrenalina", "0.1 mcg/kg/min", "EV contínuo", "Contínuo", MedicationKind::Vasoactive, true),
        ("2", "Midazolam", "2 mg/h", "EV contínuo", "Contínuo", MedicationKind::Sedation, true),
        ("3", "Vancomicina", "1g", "EV", "12/12h", MedicationKind::Antibiotic, false),
        ("4", "Fentanil", "50 mcg/h", "EV contínuo", "Contínuo", MedicationKind::Analgesic, true),
    ];
    rows.into_iter()
        .map(|(raw_id, name, dosage, route, frequency, kind, critical)| -> WardResult<Medication> {
            Ok(Medication {
                id: id(raw_id)?,
                name: name.into(),
                dosage: dosage.into(),
                route: route.into(),
                frequency: frequency.into(),
                kind,
                critical,
            })
        })
        .collect()
}

fn current_sbar() -> WardResult<SbarRecord> {
    Ok(SbarRecord {
        id: id("1")?,
        patient_id: id("1")?,
        situation: "Paciente apresentando dispneia e saturação baixa (88% em FiO2 60%)".into(),
        background: "Pneumonia grave, internado há 5 dias, em ventilação mecânica".into(),
        assessment: "Sinais vitais instáveis, necessita monitoramento contínuo. PA: 90/60, FC: 110, Tax: 38.5°C".into(),
        recommendation: "Aumentar FiO2 para 70%, reavaliar gasometria em 2 horas, considerar ajuste de PEEP".into(),
        created_at: instant("2024-01-20T14:00:00Z")?,
        shift: Shift::Afternoon,
        created_by: "Enfermeiro João".into(),
    })
}

fn tasks() -> WardResult<Vec<Task>> {
    Ok(vec![
        Task {
            id: id("1")?,
            patient_id: id("1")?,
            title: "Mudança de decúbito".into(),
            description: "Mudança de posição do paciente".into(),
            status: TaskStatus::Pending,
            priority: TaskPriority::High,
            assigned_to: "Enfermeiro João".into(),
            due_time: time("16:00")?,
            created_at: instant("2024-01-20T15:00:00Z")?,
        },
        Task {
            id: id("2")?,
            patient_id: id("2")?,
            title: "Administração de medicação".into(),
            description: "Administrar antibiótico prescrito".into(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::Medium,
            assigned_to: "Enfermeiro Maria".into(),
            due_time: time("16:30")?,
            created_at: instant("2024-01-20T15:30:00Z")?,
        },
    ])
}

fn indicators() -> WardResult<Vec<Indicator>> {
    Ok(vec![
        Indicator {
            id: id("1")?,
            kind: IndicatorKind::Lpp {
                location: Some("sacro".into()),
            },
            date: date("2024-01-20")?,
            shift: Shift::Morning,
            description: "LPP estágio 2 em região sacral".into(),
        },
        Indicator {
            id: id("2")?,
            kind: IndicatorKind::Falls {
                fall_type: Some("cama".into()),
            },
            date: date("2024-01-19")?,
            shift: Shift::Night,
            description: "Queda do leito durante mudança de posição".into(),
        },
        Indicator {
            id: id("3")?,
            kind: IndicatorKind::Extubation,
            date: date("2024-01-18")?,
            shift: Shift::Afternoon,
            description: "Extubação acidental durante procedimento".into(),
        },
        Indicator {
            id: id("4")?,
            kind: IndicatorKind::Medication,
            date: date("2024-01-17")?,
            shift: Shift::Morning,
            description: "Erro de dosagem identificado antes da administração".into(),
        },
    ])
}

fn scale_entries() -> WardResult<Vec<ScaleEntry>> {
    Ok(vec![
        ScaleEntry {
            id: id("1")?,
            technician: "João Silva".into(),
            patient: "Maria Santos".into(),
            date: date("2024-01-20")?,
            shift: Shift::Morning,
            bed_number: "102".into(),
            validated: true,
        },
        ScaleEntry {
            id: id("2")?,
            technician: "Ana Costa".into(),
            patient: "Carlos Oliveira".into(),
            date: date("2024-01-20")?,
            shift: Shift::Afternoon,
            bed_number: "103".into(),
            validated: false,
        },
    ])
}

fn assessments() -> WardResult<Vec<PhysicalAssessment>> {
    Ok(vec![PhysicalAssessment {
        id: id("1")?,
        record: AssessmentRecord {
            patient_id: id("1")?,
            date: date("2024-01-20")?,
            time: time("14:00")?,
            assessed_by: "Enfermeiro João".into(),
            neurological: Neurological {
                consciousness_level: ConsciousnessLevel::Sedated,
                glasgow_scale: 10,
                rass_scale: -2,
                pupils: Pupils::Isocoric,
                motor_response: "Responde a estímulos dolorosos".into(),
                observations: "Paciente sedado conforme protocolo".into(),
            },
            respiratory: Respiratory {
                respiratory_pattern: RespiratoryPattern::Altered,
                oxygen_use: true,
                oxygen_flow: "VM - FiO2 60%".into(),
                secretion_presence: true,
                secretion_characteristics: "Secreção amarelada, espessa".into(),
                breath_sounds: "Roncos difusos bilateralmente".into(),
                observations: "Necessita aspiração frequente".into(),
            },
            cardiovascular: Cardiovascular {
                heart_rate: 110,
                blood_pressure: "90/60".into(),
                heart_rhythm: HeartRhythm::Regular,
                peripheral_pulses: Presence::Present,
                capillary_refill: CapillaryRefill::Normal,
                edema: false,
                edema_location: String::new(),
                observations: "Em uso de noradrenalina".into(),
            },
            gastrointestinal: Gastrointestinal {
                abdomen: Abdomen::Soft,
                bowel_sounds: Presence::Diminished,
                last_evacuation: "Ontem".into(),
                feeding: Feeding::Enteral,
                nausea: false,
                vomiting: false,
                observations: "Dieta enteral por SNG".into(),
            },
            genitourinary: Genitourinary {
                urinary_output: "50ml/h".into(),
                urine_characteristics: "Amarelo claro".into(),
                bladder_catheter: true,
                catheter_type: "Foley 16Fr".into(),
                observations: "Débito urinário adequado".into(),
            },
            integumentary: Integumentary {
                skin_color: SkinColor::Pale,
                skin_temperature: SkinTemperature::Normal,
                skin_turgor: SkinTurgor::Normal,
                wounds: false,
                wound_description: String::new(),
                pressure_ulcers: true,
                pressure_ulcer_stage: "Estágio II em região sacral".into(),
                observations: "Curativo com hidrocoloide".into(),
            },
            musculoskeletal: Musculoskeletal {
                mobility: Mobility::Bedridden,
                muscle_strength: "Diminuída".into(),
                joint_movement: JointMovement::Limited,
                pain: false,
                pain_scale: 0,
                pain_location: String::new(),
                observations: "Mudança de decúbito a cada 2h".into(),
            },
            general_observations:
                "Paciente estável dentro do quadro clínico atual. Manter cuidados intensivos."
                    .into(),
        },
    }])
}

//! Constants used throughout the UTI core crate.

/// Default API root of the record-management backend.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/api/";

/// Nurse name used as author when none is configured.
pub const DEFAULT_NURSE_NAME: &str = "Enfermeiro João";

/// Default wall-clock refresh period, in seconds.
pub const DEFAULT_CLOCK_REFRESH_SECS: u64 = 60;

/// Default REST listen address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Decubitus timer value (minutes) at which a patient needs attention.
pub const DECUBITUS_ATTENTION_MINUTES: i64 = 90;

/// Decubitus timer value (minutes) at which a patient is overdue for a position change.
pub const DECUBITUS_CRITICAL_MINUTES: i64 = 120;

/// Header row of a scale CSV file.
pub const SCALE_CSV_HEADER: [&str; 5] = ["Técnico", "Paciente", "Data", "Turno", "Leito"];

/// File name offered when the scale template is downloaded.
pub const SCALE_TEMPLATE_FILENAME: &str = "template_escala.csv";

/// Downloadable scale template: the header plus two example rows.
pub const SCALE_TEMPLATE: &str = "Técnico,Paciente,Data,Turno,Leito
João Silva,Maria Santos,2024-01-21,morning,101
Ana Costa,Pedro Lima,2024-01-21,afternoon,102";

/// Default title of a task added from the dashboard.
pub const NEW_TASK_TITLE: &str = "Nova Tarefa";

/// Default description of a task added from the dashboard.
pub const NEW_TASK_DESCRIPTION: &str = "Descrição da tarefa";

/// Default due time of a task added from the dashboard.
pub const NEW_TASK_DUE_TIME: &str = "17:00";

/// Label used when a grouping key is missing.
pub const UNSPECIFIED_LABEL: &str = "Não especificado";

/// Label shown when an SBAR record points at a patient that is not on the roster.
pub const UNKNOWN_PATIENT_LABEL: &str = "Paciente não encontrado";

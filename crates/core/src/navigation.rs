//! Which view is on screen.

use crate::model::wire_enum;
use serde::{Deserialize, Serialize};
use uti_ids::RecordId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Dashboard,
    Patients,
    Sbar,
    Indicators,
    Import,
}

wire_enum!(Tab {
    Dashboard => "dashboard",
    Patients => "patients",
    Sbar => "sbar",
    Indicators => "indicators",
    Import => "import",
});

impl Tab {
    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Patients => "Pacientes",
            Tab::Sbar => "Registro SBAR",
            Tab::Indicators => "Indicadores",
            Tab::Import => "Importar Escalas",
        }
    }
}

/// A menu entry as rendered by the sidebar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub id: Tab,
    pub label: &'static str,
    pub active: bool,
}

/// Navigation state: exactly one active tab, plus the patient preselected for a new SBAR note.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shell {
    active: Tab,
    sbar_patient: Option<RecordId>,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn sbar_patient(&self) -> Option<&RecordId> {
        self.sbar_patient.as_ref()
    }

    pub fn select(&mut self, tab: Tab) {
        tracing::debug!(from = %self.active, to = %tab, "navigating");
        self.active = tab;
    }

    /// Switches to the SBAR view with `patient_id` preselected.
    pub fn new_sbar(&mut self, patient_id: RecordId) {
        *self = Self {
            active: Tab::Sbar,
            sbar_patient: Some(patient_id),
        };
    }

    pub fn menu(&self) -> Vec<MenuItem> {
        Tab::ALL
            .iter()
            .map(|&id| MenuItem {
                id,
                label: id.label(),
                active: id == self.active,
            })
            .collect()
    }
}

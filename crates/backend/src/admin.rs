//! Admin-panel field rules of the record-management backend.
//!
//! Two behaviours of the backend's admin forms are mirrored here so they can be checked and
//! reused outside a browser:
//! - the device form hides the insertion-site field (`local_insercao`) for device types that
//!   have no insertion site, re-evaluated on page load and on every change of the type selector;
//! - the patient form swaps five plain text inputs for native date/time pickers on page load.

use crate::{BackendError, BackendResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the insertion-site field in the device admin form.
pub const INSERTION_SITE_FIELD: &str = "local_insercao";

/// Message attached to the insertion-site field when it is filled for a type without one.
pub const INSERTION_SITE_NOT_ALLOWED: &str =
    "Este campo não deve ser preenchido para o tipo selecionado.";

/// Device type codes offered by the device admin form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceTypeCode {
    #[serde(rename = "CVC")]
    Cvc,
    #[serde(rename = "SNE")]
    Sne,
    #[serde(rename = "SOG")]
    Sog,
    #[serde(rename = "VM")]
    Vm,
    #[serde(rename = "Drenos")]
    Drenos,
    #[serde(rename = "SVD")]
    Svd,
    #[serde(rename = "Shilley")]
    Shilley,
    #[serde(rename = "TOT")]
    Tot,
    #[serde(rename = "TQT")]
    Tqt,
    #[serde(rename = "PAI")]
    Pai,
}

/// Device types whose form hides the insertion-site field.
pub const TYPES_WITHOUT_INSERTION_SITE: [DeviceTypeCode; 5] = [
    DeviceTypeCode::Sne,
    DeviceTypeCode::Sog,
    DeviceTypeCode::Tot,
    DeviceTypeCode::Tqt,
    DeviceTypeCode::Svd,
];

impl DeviceTypeCode {
    /// Every code, in the order the selector lists them.
    pub const ALL: [DeviceTypeCode; 10] = [
        DeviceTypeCode::Cvc,
        DeviceTypeCode::Sne,
        DeviceTypeCode::Sog,
        DeviceTypeCode::Vm,
        DeviceTypeCode::Drenos,
        DeviceTypeCode::Svd,
        DeviceTypeCode::Shilley,
        DeviceTypeCode::Tot,
        DeviceTypeCode::Tqt,
        DeviceTypeCode::Pai,
    ];

    /// Value stored by the backend.
    pub fn code(self) -> &'static str {
        match self {
            DeviceTypeCode::Cvc => "CVC",
            DeviceTypeCode::Sne => "SNE",
            DeviceTypeCode::Sog => "SOG",
            DeviceTypeCode::Vm => "VM",
            DeviceTypeCode::Drenos => "Drenos",
            DeviceTypeCode::Svd => "SVD",
            DeviceTypeCode::Shilley => "Shilley",
            DeviceTypeCode::Tot => "TOT",
            DeviceTypeCode::Tqt => "TQT",
            DeviceTypeCode::Pai => "PAI",
        }
    }

    /// Human-readable label shown in the selector.
    pub fn label(self) -> &'static str {
        match self {
            DeviceTypeCode::Cvc => "Cateter Venoso Central",
            DeviceTypeCode::Sne => "Sonda Nasoenteral",
            DeviceTypeCode::Sog => "Sonda Orogástrica",
            DeviceTypeCode::Vm => "Ventilação Mecânica",
            DeviceTypeCode::Drenos => "Drenos",
            DeviceTypeCode::Svd => "Sonda Vesical de Demora",
            DeviceTypeCode::Shilley => "Shilley",
            DeviceTypeCode::Tot => "Tubo Orotraqueal",
            DeviceTypeCode::Tqt => "Traqueostomia",
            DeviceTypeCode::Pai => "Pressão Arterial Invasiva",
        }
    }

    /// Whether a device of this type records an insertion site.
    pub fn has_insertion_site(self) -> bool {
        !TYPES_WITHOUT_INSERTION_SITE.contains(&self)
    }
}

impl fmt::Display for DeviceTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DeviceTypeCode {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceTypeCode::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| BackendError::InvalidInput(format!("unknown device type code '{s}'")))
    }
}

/// Visibility of the insertion-site field for a raw selector value.
///
/// The field is hidden only when the value is one of the blocklisted codes; an empty selection
/// or any other value keeps it visible.
pub fn insertion_site_visible(selected: &str) -> bool {
    match selected.parse::<DeviceTypeCode>() {
        Ok(code) => code.has_insertion_site(),
        Err(_) => true,
    }
}

/// Server-side check run when the device form is saved.
///
/// # Errors
///
/// Returns [`BackendError::InvalidInput`] carrying [`INSERTION_SITE_NOT_ALLOWED`] when an
/// insertion site is filled for a type that has none.
pub fn clean_device(device_type: DeviceTypeCode, insertion_site: Option<&str>) -> BackendResult<()> {
    let filled = insertion_site.is_some_and(|s| !s.trim().is_empty());
    if filled && !device_type.has_insertion_site() {
        return Err(BackendError::InvalidInput(INSERTION_SITE_NOT_ALLOWED.into()));
    }
    Ok(())
}

/// State of the device admin form's type selector and the field it controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceAdminForm {
    selected: String,
    insertion_site_visible: bool,
}

impl DeviceAdminForm {
    /// Evaluates the rule for the selector value present when the page loads.
    pub fn load(selected: impl Into<String>) -> Self {
        let selected = selected.into();
        let insertion_site_visible = insertion_site_visible(&selected);
        Self {
            selected,
            insertion_site_visible,
        }
    }

    /// Re-evaluates the rule after the selector changes. Returns the new visibility.
    pub fn change_type(&mut self, selected: impl Into<String>) -> bool {
        self.selected = selected.into();
        self.insertion_site_visible = insertion_site_visible(&self.selected);
        self.insertion_site_visible
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn insertion_site_visible(&self) -> bool {
        self.insertion_site_visible
    }
}

/// Native input kind a text field is retyped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Date,
    Time,
}

/// Patient admin form inputs retyped on page load.
pub const PATIENT_WIDGET_OVERRIDES: [(&str, InputKind); 5] = [
    ("id_data_nascimento", InputKind::Date),
    ("id_data_admissao_0", InputKind::Date),
    ("id_data_admissao_1", InputKind::Time),
    ("id_data_alta_0", InputKind::Date),
    ("id_data_alta_1", InputKind::Time),
];

/// Input kind for `field_id`, if the patient form retypes it.
pub fn coerced_input(field_id: &str) -> Option<InputKind> {
    PATIENT_WIDGET_OVERRIDES
        .iter()
        .find(|(id, _)| *id == field_id)
        .map(|(_, kind)| *kind)
}

/// Overrides applied on page load, restricted to the inputs actually present on the page.
pub fn widget_overrides_for<'a>(present: &[&'a str]) -> Vec<(&'a str, InputKind)> {
    present
        .iter()
        .filter_map(|id| coerced_input(id).map(|kind| (*id, kind)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocklisted_types_hide_insertion_site() {
        for code in ["SNE", "SOG", "TOT", "TQT", "SVD"] {
            assert!(!insertion_site_visible(code), "{code} should hide the field");
        }
    }

    #[test]
    fn other_types_and_empty_selection_show_insertion_site() {
        for code in ["CVC", "VM", "Drenos", "Shilley", "PAI", "", "unknown"] {
            assert!(insertion_site_visible(code), "{code} should show the field");
        }
    }

    #[test]
    fn form_re_evaluates_on_every_change() {
        let mut form = DeviceAdminForm::load("CVC");
        assert!(form.insertion_site_visible());

        assert!(!form.change_type("TOT"));
        assert_eq!(form.selected(), "TOT");
        assert!(!form.insertion_site_visible());

        assert!(form.change_type("PAI"));
        assert!(form.insertion_site_visible());
    }

    #[test]
    fn hidden_on_load_when_initial_type_is_blocklisted() {
        assert!(!DeviceAdminForm::load("SVD").insertion_site_visible());
    }

    #[test]
    fn clean_rejects_site_on_type_without_one() {
        let err = clean_device(DeviceTypeCode::Sne, Some("narina direita")).unwrap_err();
        match err {
            BackendError::InvalidInput(msg) => assert_eq!(msg, INSERTION_SITE_NOT_ALLOWED),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert!(clean_device(DeviceTypeCode::Sne, Some("  ")).is_ok());
        assert!(clean_device(DeviceTypeCode::Sne, None).is_ok());
        assert!(clean_device(DeviceTypeCode::Cvc, Some("subclávia direita")).is_ok());
    }

    #[test]
    fn codes_parse_and_display() {
        for code in DeviceTypeCode::ALL {
            assert_eq!(code.code().parse::<DeviceTypeCode>().unwrap(), code);
            assert!(!code.label().is_empty());
        }
        assert!("cvc".parse::<DeviceTypeCode>().is_err());
    }

    #[test]
    fn widget_coercion_covers_the_five_patient_inputs() {
        assert_eq!(coerced_input("id_data_nascimento"), Some(InputKind::Date));
        assert_eq!(coerced_input("id_data_admissao_0"), Some(InputKind::Date));
        assert_eq!(coerced_input("id_data_admissao_1"), Some(InputKind::Time));
        assert_eq!(coerced_input("id_data_alta_0"), Some(InputKind::Date));
        assert_eq!(coerced_input("id_data_alta_1"), Some(InputKind::Time));
        assert_eq!(coerced_input("id_nome"), None);
    }

    #[test]
    fn overrides_skip_missing_inputs() {
        let present = ["id_nome", "id_data_nascimento", "id_data_alta_1"];
        assert_eq!(
            widget_overrides_for(&present),
            vec![
                ("id_data_nascimento", InputKind::Date),
                ("id_data_alta_1", InputKind::Time),
            ]
        );
    }
}

//! Form validation results.
//!
//! Forms on the ward never stop at the first problem: every failing field is collected with a
//! message meant for the person filling the form, and the whole map is handed back as a value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-field validation messages, keyed by the field's wire name (e.g. `bedNumber`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field`. A later message for the same field replaces the earlier one.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Records `message` for `field` when `failed` holds.
    pub fn check(&mut self, failed: bool, field: &str, message: &str) {
        if failed {
            self.add(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failing_field() {
        let mut errors = ValidationErrors::new();
        errors.check(true, "name", "Nome é obrigatório");
        errors.check(false, "age", "Idade deve ser maior que 0");
        errors.check(true, "bedNumber", "Número do leito é obrigatório");

        assert_eq!(errors.len(), 2);
        assert!(errors.contains("name"));
        assert!(!errors.contains("age"));
        assert_eq!(errors.get("bedNumber"), Some("Número do leito é obrigatório"));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn empty_map_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn serialises_as_plain_object() {
        let mut errors = ValidationErrors::new();
        errors.add("age", "Idade deve ser maior que 0");
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"age":"Idade deve ser maior que 0"}"#);
        assert_eq!(errors.to_string(), "age: Idade deve ser maior que 0");
    }
}

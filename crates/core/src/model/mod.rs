//! Ward data model.
//!
//! Passive schema shared by every view and form. Wire names are camelCase; string-valued
//! `type`/`status` fields are enums so that every switch over them is exhaustive.

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum from a table of wire names.
macro_rules! wire_enum {
    ($ty:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Wire name of the value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = crate::WardError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($ty::$variant),)+
                    other => Err(crate::WardError::InvalidInput(format!(
                        concat!("unknown ", stringify!($ty), " '{}'"),
                        other
                    ))),
                }
            }
        }
    };
}

pub(crate) use wire_enum;

mod device;
mod indicator;
mod medication;
mod patient;
mod sbar;
mod scale;
mod shift;
mod task;

pub use device::{Device, DeviceKind, DeviceStatus, DeviceUpdate};
pub use indicator::{Indicator, IndicatorKind, IndicatorType};
pub use medication::{Medication, MedicationKind, MedicationUpdate};
pub use patient::{DecubitusBand, Patient, PatientDetail, PatientStatus};
pub use sbar::SbarRecord;
pub use scale::ScaleEntry;
pub use shift::Shift;
pub use task::{Task, TaskPriority, TaskStatus};

/// Serde adapter for wall-clock times written as `HH:MM`.
///
/// `HH:MM:SS` is accepted on input as well.
pub mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(raw, FORMAT).or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
    }
}

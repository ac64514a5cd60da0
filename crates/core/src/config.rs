//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the ward state. Binaries
//! read the environment (after loading `.env`) and hand the raw values to
//! [`CoreConfig::from_env_values`]; nothing in this crate reads process-wide environment
//! variables while handling a request.

use crate::constants::{
    DEFAULT_BACKEND_URL, DEFAULT_CLOCK_REFRESH_SECS, DEFAULT_NURSE_NAME, DEFAULT_REST_ADDR,
};
use crate::model::Shift;
use crate::{WardError, WardResult};
use chrono::{FixedOffset, Local, Offset, Utc};
use std::net::SocketAddr;
use std::time::Duration;
use uti_types::NonEmptyText;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    backend_url: String,
    nurse_name: NonEmptyText,
    shift: Option<Shift>,
    clock_refresh: Duration,
    rest_addr: SocketAddr,
    utc_offset: FixedOffset,
}

/// Raw, unvalidated configuration values as read from the environment.
#[derive(Clone, Debug, Default)]
pub struct EnvValues {
    /// `UTI_BACKEND_URL`
    pub backend_url: Option<String>,
    /// `UTI_NURSE_NAME`
    pub nurse_name: Option<String>,
    /// `UTI_SHIFT`
    pub shift: Option<String>,
    /// `UTI_CLOCK_REFRESH_SECS`
    pub clock_refresh_secs: Option<String>,
    /// `UTI_REST_ADDR`
    pub rest_addr: Option<String>,
    /// `UTI_UTC_OFFSET`, e.g. `-03:00`. Absent means UTC.
    pub utc_offset: Option<String>,
}

impl EnvValues {
    /// Reads the `UTI_*` variables from the process environment.
    ///
    /// Without `UTI_UTC_OFFSET` the host's current local offset is used.
    pub fn from_process_env() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self {
            backend_url: var("UTI_BACKEND_URL"),
            nurse_name: var("UTI_NURSE_NAME"),
            shift: var("UTI_SHIFT"),
            clock_refresh_secs: var("UTI_CLOCK_REFRESH_SECS"),
            rest_addr: var("UTI_REST_ADDR"),
            utc_offset: var("UTI_UTC_OFFSET")
                .or_else(|| Some(format_utc_offset(*Local::now().offset()))),
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        backend_url: String,
        nurse_name: String,
        shift: Option<Shift>,
        clock_refresh: Duration,
        rest_addr: SocketAddr,
        utc_offset: FixedOffset,
    ) -> WardResult<Self> {
        if backend_url.trim().is_empty() {
            return Err(WardError::InvalidInput("backend_url cannot be empty".into()));
        }
        let nurse_name = NonEmptyText::new(&nurse_name)
            .map_err(|_| WardError::InvalidInput("nurse_name cannot be empty".into()))?;
        if clock_refresh.is_zero() {
            return Err(WardError::InvalidInput(
                "clock refresh period must be greater than zero".into(),
            ));
        }

        Ok(Self {
            backend_url,
            nurse_name,
            shift,
            clock_refresh,
            rest_addr,
            utc_offset,
        })
    }

    /// Build a configuration from raw values, applying defaults for anything unset or blank.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::InvalidInput`] naming the offending variable when a value is set but
    /// cannot be parsed.
    pub fn from_env_values(values: EnvValues) -> WardResult<Self> {
        fn present(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        }

        let backend_url =
            present(values.backend_url).unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let nurse_name =
            present(values.nurse_name).unwrap_or_else(|| DEFAULT_NURSE_NAME.to_string());

        let shift = present(values.shift)
            .map(|v| {
                v.parse::<Shift>().map_err(|_| {
                    WardError::InvalidInput(format!(
                        "UTI_SHIFT must be one of morning, afternoon, night, got '{v}'"
                    ))
                })
            })
            .transpose()?;

        let refresh_secs = match present(values.clock_refresh_secs) {
            Some(v) => v.parse::<u64>().map_err(|e| {
                WardError::InvalidInput(format!("UTI_CLOCK_REFRESH_SECS '{v}' is invalid: {e}"))
            })?,
            None => DEFAULT_CLOCK_REFRESH_SECS,
        };
        if refresh_secs == 0 {
            return Err(WardError::InvalidInput(
                "UTI_CLOCK_REFRESH_SECS must be greater than zero".into(),
            ));
        }

        let rest_addr_raw =
            present(values.rest_addr).unwrap_or_else(|| DEFAULT_REST_ADDR.to_string());
        let rest_addr = rest_addr_raw.parse::<SocketAddr>().map_err(|e| {
            WardError::InvalidInput(format!("UTI_REST_ADDR '{rest_addr_raw}' is invalid: {e}"))
        })?;

        let utc_offset = match present(values.utc_offset) {
            Some(v) => parse_utc_offset(&v).ok_or_else(|| {
                WardError::InvalidInput(format!(
                    "UTI_UTC_OFFSET must look like +HH:MM or -HH:MM, got '{v}'"
                ))
            })?,
            None => utc(),
        };

        Self::new(
            backend_url,
            nurse_name,
            shift,
            Duration::from_secs(refresh_secs),
            rest_addr,
            utc_offset,
        )
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn nurse_name(&self) -> &str {
        self.nurse_name.as_str()
    }

    /// The configured shift, if pinned. Otherwise the shift follows the wall clock.
    pub fn pinned_shift(&self) -> Option<Shift> {
        self.shift
    }

    pub fn clock_refresh(&self) -> Duration {
        self.clock_refresh
    }

    pub fn rest_addr(&self) -> SocketAddr {
        self.rest_addr
    }

    /// Offset of the ward's local time. Shifts, "today" and assessment times use it.
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Parses `Z`, `UTC`, `+HH`, `+HHMM` or `+HH:MM` (and the `-` forms).
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Some(utc());
    }
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

pub fn format_utc_offset(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();
    format!("{sign}{:02}:{:02}", secs / 3600, secs % 3600 / 60)
}

//! GET-only HTTP client for the record-management backend.
//!
//! The dashboard only ever reads from the backend; there are no write paths. A failed read of
//! the patient list is logged and treated as an empty list so the caller can keep rendering.

use crate::paciente::{Paciente, RemotePatient};
use crate::{BackendError, BackendResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Url;

/// Path of the patient collection, relative to the API root.
pub const PACIENTES_PATH: &str = "pacientes/";

/// User agent string for backend requests.
const USER_AGENT_VALUE: &str = concat!("uti-dashboard/", env!("CARGO_PKG_VERSION"));

/// HTTP client bound to a fixed backend API root.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Creates a client for the API root at `base_url`.
    ///
    /// A trailing slash is added when missing so relative paths such as `pacientes/` resolve
    /// beneath the root instead of replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidInput`] if `base_url` is not an absolute http(s) URL, or
    /// [`BackendError::Request`] if the underlying client cannot be built.
    pub fn new(base_url: &str) -> BackendResult<Self> {
        let mut normalised = base_url.trim().to_string();
        if !normalised.ends_with('/') {
            normalised.push('/');
        }
        let base_url = Url::parse(&normalised)
            .map_err(|e| BackendError::InvalidInput(format!("invalid base URL '{base_url}': {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(BackendError::InvalidInput(format!(
                "base URL must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The API root every request is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the API root.
    pub fn endpoint(&self, path: &str) -> BackendResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| BackendError::InvalidInput(format!("invalid endpoint '{path}': {e}")))
    }

    /// Issues a GET for `path` and returns the response body as text.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Request`] on transport failures and [`BackendError::Status`] on
    /// non-success responses.
    pub async fn get_text(&self, path: &str) -> BackendResult<String> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetches and strictly decodes the patient list.
    pub async fn fetch_patients(&self) -> BackendResult<Vec<RemotePatient>> {
        let body = self.get_text(PACIENTES_PATH).await?;
        Paciente::parse_list(&body)
    }

    /// Fetches the patient list, degrading to an empty list on any failure.
    ///
    /// The failure is logged; there is no retry.
    pub async fn load_patients_or_empty(&self) -> Vec<RemotePatient> {
        match self.fetch_patients().await {
            Ok(patients) => {
                tracing::info!(count = patients.len(), "loaded patients from backend");
                patients
            }
            Err(e) => {
                tracing::error!("Error fetching patients from {}: {}", self.base_url, e);
                Vec::new()
            }
        }
    }
}

use api_shared::dto::ErrorRes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uti_core::{ImportError, WardError};

/// Handler error: a ward error rendered as an HTTP status and an [`ErrorRes`] body.
#[derive(Debug)]
pub struct ApiError(pub WardError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<WardError> for ApiError {
    fn from(err: WardError) -> Self {
        Self(err)
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        Self(WardError::Import(err))
    }
}

impl From<uti_ids::IdError> for ApiError {
    fn from(err: uti_ids::IdError) -> Self {
        Self(WardError::Id(err))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            WardError::NotFound { .. } => StatusCode::NOT_FOUND,
            WardError::IllegalTransition { .. } => StatusCode::CONFLICT,
            WardError::InvalidInput(_)
            | WardError::Validation(_)
            | WardError::Id(_)
            | WardError::Import(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::BAD_REQUEST {
            tracing::warn!("request rejected: {}", self.0);
        } else {
            tracing::error!("request failed: {}", self.0);
        }

        let mut body = ErrorRes::new(self.0.to_string());
        if let WardError::Validation(errors) = &self.0 {
            body.fields = errors
                .fields()
                .filter_map(|f| errors.get(f).map(|m| (f.to_string(), m.to_string())))
                .collect();
        }
        (status, Json(body)).into_response()
    }
}

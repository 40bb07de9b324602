//! Unified error types for the sample API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::validation::{FieldError, ValidationError};

/// Process-level error type.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Metrics recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// User store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A user with this id already exists.
    #[error("user id {0} already exists")]
    DuplicateId(String),
}

/// Error returned from a request handler.
///
/// Every variant is a client error and ends the request with exactly one
/// JSON response.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Inputs failed to validate.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The `token` header did not match.
    #[error("token_verification_failed")]
    TokenVerificationFailed,

    /// No user with the requested id.
    #[error("user_not_found")]
    UserNotFound,

    /// A user with the submitted id already exists.
    #[error("user_id_duplicated")]
    UserIdDuplicated,

    /// No route matches the request path.
    #[error("Not Found")]
    RouteNotFound,

    /// The path matches but not with this method.
    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateId(_) => ApiError::UserIdDuplicated,
        }
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::TokenVerificationFailed | ApiError::UserIdDuplicated => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UserNotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

/// Body of a non-validation error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Error code, e.g. `user_not_found`.
    pub detail: String,
}

/// Body of a validation error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorBody {
    /// One entry per failing field.
    pub detail: Vec<FieldError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Validation(err) => (
                status,
                Json(ValidationErrorBody {
                    detail: err.into_errors(),
                }),
            )
                .into_response(),
            other => (
                status,
                Json(ErrorBody {
                    detail: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        ApiError::Validation(self).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;

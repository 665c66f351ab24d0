//! API client error types.

use cs_validation::ErrorMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for API client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// API client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with a non-success status.
    #[error("{0}")]
    Api(ApiError),

    /// Field-level problems, either found locally or reported by the API.
    #[error("Validation failed: {0}")]
    Validation(ErrorMap),

    /// The token endpoint rejected the credentials.
    #[error("Can't log in to oauth: {0}")]
    Authentication(String),

    /// A success response lacked an identifier the caller needs.
    #[error("Failed to acquire {0} ID")]
    MissingId(&'static str),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Underlying HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// HTTP status code, if the error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status_code),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Field errors, if this is a validation failure.
    pub fn fields(&self) -> Option<&ErrorMap> {
        match self {
            Self::Validation(map) => Some(map),
            _ => None,
        }
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

impl From<ErrorMap> for ClientError {
    fn from(errors: ErrorMap) -> Self {
        Self::Validation(errors)
    }
}

impl From<ApiError> for ClientError {
    fn from(error: ApiError) -> Self {
        Self::Api(error)
    }
}

/// One field-level problem reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorField {
    /// Qualified name such as `user_profile:email`
    pub name: String,
    pub message: String,
}

impl ApiErrorField {
    /// Field name with any `prefix:` qualifier removed.
    pub fn field_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, name)| name)
    }
}

/// Error body returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ApiErrorField>,
}

impl ApiError {
    /// Field errors keyed by unqualified field name.
    pub fn field_errors(&self) -> Option<ErrorMap> {
        if self.fields.is_empty() {
            return None;
        }
        Some(
            self.fields
                .iter()
                .map(|f| (f.field_name().to_string(), f.message.clone()))
                .collect(),
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "status code: {}, path: {}, message: {}, error_type: {}",
            self.status_code, self.path, self.message, self.error_type
        )
    }
}

impl std::error::Error for ApiError {}

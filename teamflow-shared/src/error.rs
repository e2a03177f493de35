/// Service-layer error taxonomy
///
/// Every operation in [`crate::services`] fails with a [`ServiceError`]. The
/// transport layers (REST and GraphQL) never inspect error messages; they
/// switch on [`ServiceError::kind`] to pick a status code or error code.
///
/// # Example
///
/// ```
/// use teamflow_shared::error::{ErrorKind, ServiceError};
///
/// let err = ServiceError::NotFound("Project");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.kind().code(), "NOT_FOUND");
/// ```

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// Result alias used by all services
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Closed set of failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Missing or malformed input
    Validation,

    /// Email or username already taken
    DuplicateIdentity,

    /// Unknown email or wrong password (deliberately indistinguishable)
    InvalidCredentials,

    /// Protected operation without a valid identity
    AuthenticationRequired,

    /// Resource absent, or owned by someone else
    NotFound,

    /// Unexpected storage or infrastructure failure
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code used in REST bodies and GraphQL extensions
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::DuplicateIdentity => "DUPLICATE_IDENTITY",
            ErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorKind::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error returned by every service operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldViolation>),

    #[error("User with this email or username already exists")]
    DuplicateIdentity,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    AuthenticationRequired,

    /// Carries the resource name only, never the looked-up identifier
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ServiceError {
    /// Shorthand for a single-field validation failure
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation(vec![FieldViolation::new(field, message)])
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::DuplicateIdentity => ErrorKind::DuplicateIdentity,
            ServiceError::InvalidCredentials => ErrorKind::InvalidCredentials,
            ServiceError::AuthenticationRequired => ErrorKind::AuthenticationRequired,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Field violations, if this is a validation error
    pub fn violations(&self) -> Option<&[FieldViolation]> {
        match self {
            ServiceError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldViolation {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        // HashMap iteration order is unstable; keep responses deterministic
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        ServiceError::Validation(violations)
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { .. } => ServiceError::DuplicateIdentity,
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ServiceError::Internal(msg),
            JwtError::Expired | JwtError::InvalidToken(_) => ServiceError::AuthenticationRequired,
        }
    }
}

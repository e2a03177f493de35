/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; failures become a JSON body of the form
///
/// ```json
/// { "success": false, "error": "VALIDATION_ERROR", "message": "...", "details": [...] }
/// ```
///
/// The status code and `error` code are derived from the service
/// [`ErrorKind`], never from the message text.
///
/// # Example
///
/// ```
/// use teamflow_api::error::{ApiError, ApiResult};
/// use teamflow_shared::error::ServiceError;
///
/// fn lookup() -> ApiResult<()> {
///     let found: Result<(), ServiceError> = Err(ServiceError::NotFound("Project"));
///     found?;
///     Ok(())
/// }
///
/// assert!(matches!(lookup(), Err(ApiError::NotFound(_))));
/// ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use teamflow_shared::auth::middleware::AuthError;
use teamflow_shared::error::{ErrorKind, FieldViolation, ServiceError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Body could not be parsed (400)
    BadRequest(String),

    /// Field validation failed (400)
    ValidationError(Vec<FieldViolation>),

    /// Email or username taken (409)
    Conflict(String),

    /// Login failed (401)
    InvalidCredentials,

    /// Missing or invalid bearer token (401)
    Unauthorized(String),

    /// Not found or not owned by the caller (404)
    NotFound(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Success envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Error envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,

    /// Machine-readable code, e.g. `NOT_FOUND`
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Per-field validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => ErrorKind::Validation,
            ApiError::Conflict(_) => ErrorKind::DuplicateIdentity,
            ApiError::InvalidCredentials => ErrorKind::InvalidCredentials,
            ApiError::Unauthorized(_) => ErrorKind::AuthenticationRequired,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::InternalError(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::DuplicateIdentity => StatusCode::CONFLICT,
            ErrorKind::InvalidCredentials | ErrorKind::AuthenticationRequired => {
                StatusCode::UNAUTHORIZED
            }
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InvalidCredentials => write!(f, "Invalid credentials"),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.kind().code();

        let (message, details) = match self {
            ApiError::BadRequest(msg) => (msg, None),
            ApiError::ValidationError(errors) => ("Validation failed".to_string(), Some(errors)),
            ApiError::Conflict(msg) => (msg, None),
            ApiError::InvalidCredentials => ("Invalid credentials".to_string(), None),
            ApiError::Unauthorized(msg) => (msg, None),
            ApiError::NotFound(msg) => (msg, None),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                ("An internal error occurred".to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(violations) => ApiError::ValidationError(violations),
            ServiceError::DuplicateIdentity => ApiError::Conflict(err.to_string()),
            ServiceError::InvalidCredentials => ApiError::InvalidCredentials,
            ServiceError::AuthenticationRequired => ApiError::Unauthorized(err.to_string()),
            ServiceError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ServiceError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::Unauthorized("No token provided".to_string()),
            AuthError::InvalidFormat => ApiError::Unauthorized("Expected Bearer token".to_string()),
            AuthError::InvalidToken(_) | AuthError::UnknownUser(_) => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

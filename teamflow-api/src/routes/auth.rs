/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Create an account, returns a token
/// - `POST /auth/login` - Exchange credentials for a token
/// - `GET /auth/me` - The authenticated user (bearer token required)
///
/// Successful responses use the envelope `{"success": true, "data": ...}`.

use crate::{
    app::AppState,
    error::{ApiResponse, ApiResult},
};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use teamflow_shared::auth::identity::CurrentUser;
use teamflow_shared::services::auth::{AuthPayload, LoginInput, RegisterInput};

/// Register request
///
/// Missing fields deserialize as empty and are reported as validation errors.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// { "email": "alice@example.com", "username": "alice", "password": "pw123" }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJ...",
///     "user": { "id": "uuid", "email": "alice@example.com", "username": "alice",
///               "createdAt": "...", "updatedAt": "..." }
///   }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing field, malformed email or body
/// - `409 Conflict`: Email or username already registered
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthPayload>>)> {
    let Json(req) = payload?;

    let session = state
        .services
        .auth
        .register(RegisterInput {
            email: req.email,
            username: req.username,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::ok(session)))
}

/// Login with email and password
///
/// # Errors
///
/// - `400 Bad Request`: Missing email or password
/// - `401 Unauthorized`: Unknown email or wrong password (same response)
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<AuthPayload>>> {
    let Json(req) = payload?;

    let session = state
        .services
        .auth
        .login(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(ApiResponse::ok(session))
}

/// The user the bearer token belongs to
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<ApiResponse<CurrentUser>> {
    ApiResponse::ok(user)
}

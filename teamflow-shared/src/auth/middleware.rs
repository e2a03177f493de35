/// Request authentication
///
/// [`Authenticator`] turns the `Authorization: Bearer <token>` header of an
/// inbound request into a [`RequestIdentity`]. It offers two policies because
/// the two transport surfaces apply auth at different layers:
///
/// - [`Authenticator::require`]: strict. Used by the REST route layer, which
///   rejects the request with 401 on any failure.
/// - [`Authenticator::resolve`]: lenient. Used by the GraphQL endpoint; a
///   missing or bad token yields [`RequestIdentity::Anonymous`] and each
///   resolver's service call decides whether that is acceptable.
///
/// Successful verification always re-loads the user by id, so a token for a
/// user that no longer exists does not authenticate. Nothing is cached across
/// requests.
///
/// # Example
///
/// ```no_run
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use teamflow_shared::auth::middleware::Authenticator;
///
/// # async fn example(authenticator: Authenticator, token: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let mut headers = HeaderMap::new();
/// headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
///
/// let user = authenticator.require(&headers).await?;
/// println!("Request made by {}", user.username);
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::identity::{CurrentUser, RequestIdentity};
use super::jwt::{JwtError, TokenIssuer};
use crate::error::{ErrorKind, ServiceError};
use crate::services::auth::AuthService;

/// Why a request could not be authenticated
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header
    #[error("No token provided")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Expected Bearer token")]
    InvalidFormat,

    /// Token failed verification
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    /// Token is valid but its subject no longer exists
    #[error("Token subject {0} does not exist")]
    UnknownUser(Uuid),

    /// Identity lookup failed
    #[error("Identity lookup failed: {0}")]
    Internal(String),
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(msg) => ServiceError::Internal(msg),
            _ => ServiceError::AuthenticationRequired,
        }
    }
}

/// Extracts the bearer token from request headers
///
/// Returns `Ok(None)` when there is no `Authorization` header at all.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidFormat)?;

    Ok(Some(token))
}

/// Resolves bearer tokens to request identities
#[derive(Clone)]
pub struct Authenticator {
    tokens: Arc<TokenIssuer>,
    auth: AuthService,
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenIssuer>, auth: AuthService) -> Self {
        Self { tokens, auth }
    }

    /// Verifies a raw token and loads its user
    pub async fn identify(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let claims = self.tokens.verify(token)?;

        match self.auth.get_by_id(claims.sub).await {
            Ok(user) => Ok(user),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(AuthError::UnknownUser(claims.sub)),
            Err(err) => Err(AuthError::Internal(err.to_string())),
        }
    }

    /// Identity for the request; anonymous only when no header was sent
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<RequestIdentity, AuthError> {
        match bearer_token(headers)? {
            Some(token) => Ok(RequestIdentity::Authenticated(self.identify(token).await?)),
            None => Ok(RequestIdentity::Anonymous),
        }
    }

    /// Strict policy: an authenticated user or an error
    pub async fn require(&self, headers: &HeaderMap) -> Result<CurrentUser, AuthError> {
        match self.authenticate(headers).await? {
            RequestIdentity::Authenticated(user) => Ok(user),
            RequestIdentity::Anonymous => Err(AuthError::MissingCredentials),
        }
    }

    /// Lenient policy: any failure degrades to anonymous
    pub async fn resolve(&self, headers: &HeaderMap) -> RequestIdentity {
        match self.authenticate(headers).await {
            Ok(identity) => identity,
            Err(AuthError::Internal(msg)) => {
                warn!(error = %msg, "Identity lookup failed, continuing as anonymous");
                RequestIdentity::Anonymous
            }
            Err(err) => {
                debug!(reason = %err, "Bearer token rejected, continuing as anonymous");
                RequestIdentity::Anonymous
            }
        }
    }
}

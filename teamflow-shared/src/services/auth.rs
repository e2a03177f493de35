/// Registration and login
///
/// # Flow
///
/// - **register**: normalize, validate, reject taken email/username, hash the
///   password, create the user, issue a token.
/// - **login**: look up by email, verify the password, issue a token. An
///   unknown email and a wrong password produce the same
///   [`ServiceError::InvalidCredentials`] after the same amount of Argon2
///   work, so callers cannot probe for registered addresses.
///
/// Password hashing and verification run on the blocking pool.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use chrono::Duration;
/// use teamflow_shared::auth::jwt::TokenIssuer;
/// use teamflow_shared::auth::password::CredentialHasher;
/// use teamflow_shared::services::auth::{AuthService, LoginInput, RegisterInput};
/// use teamflow_shared::store::memory::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = Arc::new(TokenIssuer::new("secret-key-that-is-at-least-32-bytes", Duration::days(7)));
/// let auth = AuthService::new(Arc::new(MemoryStore::new()), tokens, CredentialHasher::default());
///
/// auth.register(RegisterInput {
///     email: "alice@example.com".to_string(),
///     username: "alice".to_string(),
///     password: "pw123".to_string(),
/// }).await?;
///
/// let session = auth.login(LoginInput {
///     email: "alice@example.com".to_string(),
///     password: "pw123".to_string(),
/// }).await?;
/// println!("token: {}", session.token);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::require_present;
use crate::auth::identity::CurrentUser;
use crate::auth::jwt::{SessionClaim, TokenIssuer};
use crate::auth::password::CredentialHasher;
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{normalize_email, CreateUser, User};
use crate::store::IdentityStore;

/// Verified against when the email is unknown
const DUMMY_PASSWORD: &str = "teamflow-timing-equalizer";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(max = 50, message = "Username must be at most 50 characters"))]
    pub username: String,

    pub password: String,
}

impl RegisterInput {
    fn normalized(self) -> Self {
        Self {
            email: normalize_email(&self.email),
            username: self.username.trim().to_string(),
            password: self.password,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Token plus the identity it was issued for
#[derive(Debug, Clone, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: CurrentUser,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn IdentityStore>,
    tokens: Arc<TokenIssuer>,
    hasher: CredentialHasher,
    dummy_hash: Arc<OnceLock<String>>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn IdentityStore>,
        tokens: Arc<TokenIssuer>,
        hasher: CredentialHasher,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Creates an account and opens a session for it
    ///
    /// # Errors
    ///
    /// - `Validation` for blank fields, a malformed email or overlong values
    /// - `DuplicateIdentity` if the email or username is taken, including
    ///   when a concurrent registration wins the race at the storage layer
    pub async fn register(&self, input: RegisterInput) -> ServiceResult<AuthPayload> {
        let input = input.normalized();
        require_present(&[
            ("email", input.email.as_str()),
            ("username", input.username.as_str()),
            ("password", input.password.as_str()),
        ])?;
        input.validate()?;

        if self
            .users
            .find_user_by_email_or_username(&input.email, &input.username)
            .await?
            .is_some()
        {
            debug!(username = %input.username, "Registration rejected: identity taken");
            return Err(ServiceError::DuplicateIdentity);
        }

        let password_hash = self.hash_password(input.password).await?;

        let user = self
            .users
            .create_user(CreateUser {
                email: input.email,
                username: input.username,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        self.open_session(user)
    }

    /// Exchanges credentials for a session
    pub async fn login(&self, input: LoginInput) -> ServiceResult<AuthPayload> {
        let email = normalize_email(&input.email);
        require_present(&[("email", email.as_str()), ("password", input.password.as_str())])?;

        let user = self.users.find_user_by_email(&email).await?;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());

        let valid = self.verify_password(input.password, stored_hash).await?;

        match user {
            Some(user) if valid => {
                info!(user_id = %user.id, "User logged in");
                self.open_session(user)
            }
            _ => {
                debug!("Login rejected");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }

    /// Public projection of a user
    pub async fn get_by_id(&self, id: Uuid) -> ServiceResult<CurrentUser> {
        self.users
            .find_user_by_id(id)
            .await?
            .map(CurrentUser::from)
            .ok_or(ServiceError::NotFound("User"))
    }

    fn open_session(&self, user: User) -> ServiceResult<AuthPayload> {
        let token = self.tokens.issue(&SessionClaim::new(user.id, &user.email))?;
        Ok(AuthPayload {
            token,
            user: user.into(),
        })
    }

    async fn hash_password(&self, password: String) -> ServiceResult<String> {
        let hasher = self.hasher.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::Internal(format!("Hashing task failed: {}", e)))??;
        Ok(hash)
    }

    /// Verifies against the stored hash, or the dummy hash if there is none
    async fn verify_password(
        &self,
        password: String,
        stored_hash: Option<String>,
    ) -> ServiceResult<bool> {
        let hasher = self.hasher.clone();
        let dummy_hash = self.dummy_hash.clone();

        tokio::task::spawn_blocking(move || {
            let hash = match stored_hash {
                Some(hash) => hash,
                None => dummy_hash
                    .get_or_init(|| hasher.hash(DUMMY_PASSWORD).unwrap_or_default())
                    .clone(),
            };
            hasher.verify(&password, &hash)
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("Verification task failed: {}", e)))
    }
}

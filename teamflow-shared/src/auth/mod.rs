/// Authentication primitives for TeamFlow
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Session token issuance and verification
/// - [`identity`]: Request-scoped identity and the public user projection
/// - [`middleware`]: Bearer token extraction and request authentication
///
/// # Example
///
/// ```
/// use teamflow_shared::auth::jwt::{SessionClaim, TokenIssuer};
/// use teamflow_shared::auth::password::{CredentialHasher, PasswordParams};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = CredentialHasher::new(PasswordParams::default());
/// let hash = hasher.hash("user_password")?;
/// assert!(hasher.verify("user_password", &hash));
///
/// let issuer = TokenIssuer::new("secret-key-that-is-at-least-32-bytes", Duration::days(7));
/// let token = issuer.issue(&SessionClaim::new(Uuid::new_v4(), "user@example.com"))?;
/// # Ok(())
/// # }
/// ```

pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod password;

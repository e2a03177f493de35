/// Session token issuance and verification
///
/// Sessions are stateless: a token carries the user's id and email plus
/// issued-at and expiry timestamps, signed with HS256. Nothing is stored
/// server-side, so rotating the signing secret invalidates every outstanding
/// token.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: Fixed window from issuance (default 7 days)
/// - **Validation**: Signature, expiration, not-before and issuer checks
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Example
///
/// ```
/// use teamflow_shared::auth::jwt::{SessionClaim, TokenIssuer};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let issuer = TokenIssuer::new("your-secret-key-at-least-32-bytes", Duration::days(7));
/// let user_id = Uuid::new_v4();
///
/// let token = issuer.issue(&SessionClaim::new(user_id, "alice@example.com"))?;
/// let claims = issuer.verify(&token)?;
/// assert_eq!(claims.sub, user_id);
/// assert_eq!(claims.email, "alice@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Issuer embedded in and required of every token
pub const ISSUER: &str = "teamflow";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Bad signature, malformed token, wrong issuer or algorithm
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Identity facts a token is issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaim {
    pub user_id: Uuid,
    pub email: String,
}

impl SessionClaim {
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}

/// JWT claims structure
///
/// - `sub`: Subject (user ID)
/// - `email`: User email at issuance
/// - `iss`: Issuer (always "teamflow")
/// - `iat` / `nbf` / `exp`: Unix timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    /// Creates claims valid from now for `ttl`
    ///
    /// Fails if the expiry falls outside the representable date range.
    pub fn new(claim: &SessionClaim, ttl: Duration) -> Result<Self, JwtError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::CreateError(format!("Token lifetime out of range: {}", ttl)))?;

        Ok(Self {
            sub: claim.user_id,
            email: claim.email.clone(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// The identity facts carried by these claims
    pub fn session(&self) -> SessionClaim {
        SessionClaim::new(self.sub, self.email.clone())
    }

}

/// Signs and verifies session tokens with one process-wide secret
///
/// Built once at startup and shared behind an `Arc`; it holds no mutable
/// state.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Creates an issuer signing with `secret`, tokens valid for `ttl`
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issues a signed token for the claim
    pub fn issue(&self, claim: &SessionClaim) -> Result<String, JwtError> {
        self.encode(&Claims::new(claim, self.ttl)?)
    }

    /// Signs arbitrary claims
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Validates a token and returns the claims embedded at issuance
    ///
    /// Fails if the signature does not match, the token is malformed, the
    /// issuer is not `teamflow`, or the expiry has passed.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, Duration::days(7))
    }

    #[test]
    fn test_issue_and_verify() {
        let user_id = Uuid::new_v4();
        let token = issuer()
            .issue(&SessionClaim::new(user_id, "alice@example.com"))
            .expect("Should create token");

        let claims = issuer().verify(&token).expect("Should validate token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.session(), SessionClaim::new(user_id, "alice@example.com"));
    }

    #[test]
    fn test_expiry_window() {
        let claims =
            Claims::new(&SessionClaim::new(Uuid::new_v4(), "a@b.c"), Duration::hours(1)).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.nbf, claims.iat);
    }

    #[test]
    fn test_oversized_lifetime_is_an_error() {
        let issuer = TokenIssuer::new(SECRET, Duration::days(100_000_000));
        let result = issuer.issue(&SessionClaim::new(Uuid::new_v4(), "a@b.c"));

        assert!(matches!(result, Err(JwtError::CreateError(_))));
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let token = issuer()
            .issue(&SessionClaim::new(Uuid::new_v4(), "a@b.c"))
            .unwrap();

        let other = TokenIssuer::new("another-secret-key-at-least-32-bytes", Duration::days(7));
        assert!(matches!(other.verify(&token), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_verify_expired_token() {
        let expired = TokenIssuer::new(SECRET, Duration::seconds(-3600));
        let token = expired
            .issue(&SessionClaim::new(Uuid::new_v4(), "a@b.c"))
            .unwrap();

        assert!(matches!(issuer().verify(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_verify_malformed_token() {
        assert!(matches!(issuer().verify("not-a-jwt"), Err(JwtError::InvalidToken(_))));
        assert!(matches!(issuer().verify(""), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_verify_tampered_payload() {
        let token = issuer()
            .issue(&SessionClaim::new(Uuid::new_v4(), "a@b.c"))
            .unwrap();

        // Swap the payload for one issued to somebody else
        let forged = issuer()
            .issue(&SessionClaim::new(Uuid::new_v4(), "mallory@evil.test"))
            .unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(issuer().verify(&spliced).is_err());
    }

    #[test]
    fn test_verify_wrong_issuer() {
        let mut claims =
            Claims::new(&SessionClaim::new(Uuid::new_v4(), "a@b.c"), Duration::hours(1)).unwrap();
        claims.iss = "someone-else".to_string();
        let token = issuer().encode(&claims).unwrap();

        assert!(matches!(issuer().verify(&token), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_debug_hides_keys() {
        let debug = format!("{:?}", issuer());
        assert!(!debug.contains(SECRET));
    }
}

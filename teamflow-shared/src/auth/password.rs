/// Password hashing module using Argon2id
///
/// Passwords are hashed with Argon2id and stored as PHC strings, which embed
/// the algorithm, parameters and salt. Verification reads the parameters back
/// out of the stored hash, so raising the work factor only affects new hashes.
///
/// # Work Factor
///
/// | Parameter   | Default |
/// |-------------|---------|
/// | Memory      | 64 MB   |
/// | Iterations  | 3       |
/// | Parallelism | 4       |
///
/// # Example
///
/// ```
/// use teamflow_shared::auth::password::{CredentialHasher, PasswordParams};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = CredentialHasher::new(PasswordParams::default());
/// let hash = hasher.hash("super_secret_password_123")?;
///
/// assert!(hasher.verify("super_secret_password_123", &hash));
/// assert!(!hasher.verify("wrong_password", &hash));
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, ParamsBuilder, Version,
};
use serde::{Deserialize, Serialize};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Work factor parameters rejected by Argon2
    #[error("Invalid Argon2 parameters: {0}")]
    InvalidParams(String),
}

/// Argon2id work factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordParams {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes
    pub iterations: u32,

    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            memory_kib: 65536, // 64 MB
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl PasswordParams {
    fn build(&self) -> Result<Params, PasswordError> {
        ParamsBuilder::new()
            .m_cost(self.memory_kib)
            .t_cost(self.iterations)
            .p_cost(self.parallelism)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))
    }
}

/// Hashes and verifies passwords with a fixed work factor
///
/// Cheap to clone; hashing is CPU bound, so async callers should run it on
/// the blocking pool.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: PasswordParams,
}

impl CredentialHasher {
    /// Creates a hasher with the given work factor
    pub fn new(params: PasswordParams) -> Self {
        Self { params }
    }

    /// Validates that Argon2 accepts the configured parameters
    pub fn check_params(&self) -> Result<(), PasswordError> {
        self.params.build().map(|_| ())
    }

    /// Hashes a password with a fresh random salt
    ///
    /// Returns a PHC string such as
    /// `$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.build()?);

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored PHC hash
    ///
    /// Returns `false` for a wrong password and for a hash that cannot be
    /// parsed or verified; callers cannot tell the two apart.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };

        // Parameters come from the hash itself
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new(PasswordParams::default())
    }
}

/// Configuration management for the API server
///
/// Configuration is read from environment variables once at startup. A `.env`
/// file in the working directory is loaded first if present.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 4000)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Token signing secret, at least 32 characters (required)
/// - `JWT_EXPIRES_IN`: Token lifetime such as `7d`, `12h`, `30m` (default: 7d,
///   at most 365d)
/// - `PASSWORD_MEMORY_KIB`, `PASSWORD_ITERATIONS`, `PASSWORD_PARALLELISM`:
///   Argon2id work factor (defaults: 65536, 3, 4)
/// - `RUST_LOG`, `LOG_FORMAT`: Read by the tracing setup in `main`
///
/// # Example
///
/// ```no_run
/// use teamflow_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use std::env;
use std::fmt;
use std::str::FromStr;
use teamflow_shared::auth::password::PasswordParams;

/// Upper bound for `JWT_EXPIRES_IN`
pub const MAX_TOKEN_LIFETIME_DAYS: i64 = 365;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,

    /// Argon2id work factor for new password hashes
    pub password: PasswordParams,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Token signing configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for HS256 signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Lifetime of issued tokens
    pub expires_in: chrono::Duration,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_URL` or `JWT_SECRET` is missing
    /// - `JWT_SECRET` is shorter than 32 characters
    /// - A numeric or duration variable cannot be parsed
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "API_PORT", 4000u16)?;
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10u32)?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }
        let expires_in = match lookup("JWT_EXPIRES_IN") {
            Some(raw) => parse_duration(&raw).context("Invalid JWT_EXPIRES_IN")?,
            None => chrono::Duration::days(7),
        };
        if expires_in > chrono::Duration::days(MAX_TOKEN_LIFETIME_DAYS) {
            anyhow::bail!(
                "JWT_EXPIRES_IN must be at most {} days",
                MAX_TOKEN_LIFETIME_DAYS
            );
        }

        let defaults = PasswordParams::default();
        let password = PasswordParams {
            memory_kib: parse_or(&lookup, "PASSWORD_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "PASSWORD_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "PASSWORD_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expires_in,
            },
            password,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

/// Parses `7d`, `12h`, `30m`, `45s` or a bare number of seconds
pub fn parse_duration(raw: &str) -> anyhow::Result<chrono::Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], c),
        Some(_) => (raw, 's'),
        None => anyhow::bail!("Duration is empty"),
    };

    let amount: i64 = digits
        .parse()
        .with_context(|| format!("Invalid duration: {:?}", raw))?;
    if amount <= 0 {
        anyhow::bail!("Duration must be positive: {:?}", raw);
    }

    let duration = match unit.to_ascii_lowercase() {
        'd' => chrono::Duration::try_days(amount),
        'h' => chrono::Duration::try_hours(amount),
        'm' => chrono::Duration::try_minutes(amount),
        's' => chrono::Duration::try_seconds(amount),
        other => anyhow::bail!("Unknown duration unit '{}' in {:?}", other, raw),
    };

    duration.ok_or_else(|| anyhow::anyhow!("Duration out of range: {:?}", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn from_pairs(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[
            ("DATABASE_URL", "postgresql://localhost/teamflow"),
            ("JWT_SECRET", SECRET),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:4000");
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.expires_in, chrono::Duration::days(7));
        assert_eq!(config.password, PasswordParams::default());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "8080"),
            ("CORS_ORIGINS", "http://localhost:3000, https://app.example.com"),
            ("DATABASE_URL", "postgresql://localhost/teamflow"),
            ("JWT_SECRET", SECRET),
            ("JWT_EXPIRES_IN", "12h"),
            ("PASSWORD_MEMORY_KIB", "19456"),
            ("PASSWORD_ITERATIONS", "2"),
            ("PASSWORD_PARALLELISM", "1"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.api.cors_origins.len(), 2);
        assert_eq!(config.api.cors_origins[1], "https://app.example.com");
        assert_eq!(config.jwt.expires_in, chrono::Duration::hours(12));
        assert_eq!(config.password.memory_kib, 19456);
        assert_eq!(config.password.iterations, 2);
    }

    #[test]
    fn test_required_and_invalid_values() {
        assert!(from_pairs(&[("JWT_SECRET", SECRET)]).is_err());
        assert!(from_pairs(&[("DATABASE_URL", "postgresql://localhost/teamflow")]).is_err());
        assert!(from_pairs(&[
            ("DATABASE_URL", "postgresql://localhost/teamflow"),
            ("JWT_SECRET", "too-short"),
        ])
        .is_err());
        assert!(from_pairs(&[
            ("DATABASE_URL", "postgresql://localhost/teamflow"),
            ("JWT_SECRET", SECRET),
            ("API_PORT", "not-a-port"),
        ])
        .is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("7d").unwrap(), chrono::Duration::days(7));
        assert_eq!(parse_duration("30m").unwrap(), chrono::Duration::minutes(30));
        assert_eq!(parse_duration("45s").unwrap(), chrono::Duration::seconds(45));
        assert_eq!(parse_duration("3600").unwrap(), chrono::Duration::hours(1));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("d").is_err());
        assert!(parse_duration("5w").is_err());
        assert!(parse_duration("-1h").is_err());
        assert!(parse_duration("99999999999999999d").is_err());
    }

    #[test]
    fn test_token_lifetime_is_capped() {
        let with_expiry = |raw: &'static str| {
            from_pairs(&[
                ("DATABASE_URL", "postgresql://localhost/teamflow"),
                ("JWT_SECRET", SECRET),
                ("JWT_EXPIRES_IN", raw),
            ])
        };

        assert!(with_expiry("100000000d").is_err());
        assert!(with_expiry("366d").is_err());
        assert_eq!(
            with_expiry("365d").unwrap().jwt.expires_in,
            chrono::Duration::days(365)
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let jwt = JwtConfig {
            secret: SECRET.to_string(),
            expires_in: chrono::Duration::days(7),
        };
        assert!(!format!("{:?}", jwt).contains(SECRET));
    }
}

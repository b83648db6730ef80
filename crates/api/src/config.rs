//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SOUQ_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `SOUQ_TOKEN_SECRET` - Bearer token signing secret (min 32 chars, high entropy)
//! - `OTPIQ_API_KEY` - SMS/WhatsApp gateway API key
//! - `IMAGEKIT_PRIVATE_KEY` - Image host private key
//!
//! ## Optional
//! - `SOUQ_HOST` - Bind address (default: 0.0.0.0)
//! - `SOUQ_PORT` - Listen port (default: 3000)
//! - `SOUQ_ENV` - Environment tag: development, production, test (default: development)
//! - `SOUQ_APP_NAME` - Application name (default: souq-api)
//! - `SOUQ_APP_VERSION` - Version reported in the response envelope (default: crate version)
//! - `SOUQ_API_PREFIX` - API base path prefix (default: api)
//! - `SOUQ_API_VERSION` - API version segment (default: v1)
//! - `OTPIQ_COUNTRY_CODE` - Dial prefix prepended before dispatch (default: 964)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Deployment environment tag.
///
/// Controls whether OTP codes are echoed back in responses (development only)
/// and is reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    /// The wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    /// Whether this is a development environment.
    #[must_use]
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(format!(
                "expected development, production, or test (got {other})"
            )),
        }
    }
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Application name, used in startup logging
    pub app_name: String,
    /// Version reported in the response envelope `meta.version`
    pub app_version: String,
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Deployment environment tag
    pub environment: Environment,
    /// API base path prefix (e.g. "api")
    pub api_prefix: String,
    /// API version segment (e.g. "v1")
    pub api_version: String,
    /// Bearer token signing secret
    pub token_secret: SecretString,
    /// SMS/WhatsApp gateway configuration
    pub sms: SmsConfig,
    /// Image host configuration
    pub images: ImageHostConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// SMS/WhatsApp gateway (OTPIQ) configuration.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    /// Gateway API key
    pub api_key: SecretString,
    /// Dial prefix prepended to the subscriber number before dispatch
    pub country_code: String,
}

/// Image host (`ImageKit`) configuration.
#[derive(Debug, Clone)]
pub struct ImageHostConfig {
    /// Private API key, sent as the basic-auth username
    pub private_key: SecretString,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the token secret fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let app_name = get_env_or_default("SOUQ_APP_NAME", "souq-api");
        let app_version = get_env_or_default("SOUQ_APP_VERSION", env!("CARGO_PKG_VERSION"));
        let database_url = get_database_url("SOUQ_DATABASE_URL")?;
        let host = get_env_or_default("SOUQ_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SOUQ_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SOUQ_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SOUQ_PORT".to_string(), e.to_string()))?;
        let environment = get_env_or_default("SOUQ_ENV", "development")
            .parse::<Environment>()
            .map_err(|e| ConfigError::InvalidEnvVar("SOUQ_ENV".to_string(), e))?;
        let api_prefix = get_env_or_default("SOUQ_API_PREFIX", "api");
        let api_version = get_env_or_default("SOUQ_API_VERSION", "v1");

        let token_secret = get_validated_secret("SOUQ_TOKEN_SECRET")?;
        validate_token_secret(&token_secret, "SOUQ_TOKEN_SECRET")?;

        let sms = SmsConfig::from_env()?;
        let images = ImageHostConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            app_name,
            app_version,
            database_url,
            host,
            port,
            environment,
            api_prefix,
            api_version,
            token_secret,
            sms,
            images,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the versioned API base path, e.g. `/api/v1`.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!(
            "/{}/{}",
            self.api_prefix.trim_matches('/'),
            self.api_version.trim_matches('/')
        )
    }
}

impl SmsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: get_required_secret("OTPIQ_API_KEY")?,
            country_code: get_env_or_default("OTPIQ_COUNTRY_CODE", "964"),
        })
    }
}

impl ImageHostConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            private_key: get_required_secret("IMAGEKIT_PRIVATE_KEY")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    // Fallback to generic DATABASE_URL (set by managed postgres attach)
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that the token secret meets minimum length requirements.
fn validate_token_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        // Random-looking string should have high entropy
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-signing-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_token_secret_too_short() {
        let secret = SecretString::from("short");
        let result = validate_token_secret(&secret, "TEST_SECRET");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_token_secret_valid_length() {
        let secret = SecretString::from("a".repeat(32));
        let result = validate_token_secret(&secret, "TEST_SECRET");
        assert!(result.is_ok());
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
        assert!(Environment::Development.is_development());
        assert!(!Environment::Test.is_development());
    }

    #[test]
    fn test_api_base_trims_slashes() {
        let config = test_config();
        assert_eq!(config.api_base(), "/api/v1");
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    fn test_config() -> ApiConfig {
        ApiConfig {
            app_name: "souq-api".to_string(),
            app_version: "0.1.0".to_string(),
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            environment: Environment::Test,
            api_prefix: "/api/".to_string(),
            api_version: "v1".to_string(),
            token_secret: SecretString::from("x".repeat(32)),
            sms: SmsConfig {
                api_key: SecretString::from("sms-key"),
                country_code: "964".to_string(),
            },
            images: ImageHostConfig {
                private_key: SecretString::from("imagekit-key"),
            },
            sentry_dsn: None,
        }
    }
}

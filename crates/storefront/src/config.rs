//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `HAWK_API_BASE_URL` - Backend REST API root (default: `https://hawk-leather-backend.vercel.app/api/v1`)
//! - `HAWK_SESSION_PATH` - File holding the persisted session (default: `.hawk/session.json`)
//! - `HAWK_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `HAWK_CATALOG_CACHE_TTL_SECS` - Product cache lifetime, 0 disables (default: 300)
//! - `HAWK_STORE_NAME` - Merchant name shown by the payment gateway (default: Hawk Leather)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "https://hawk-leather-backend.vercel.app/api/v1";
const DEFAULT_SESSION_PATH: &str = ".hawk/session.json";
const DEFAULT_REQUEST_TIMEOUT_SECS: &str = "30";
const DEFAULT_CATALOG_CACHE_TTL_SECS: &str = "300";
const DEFAULT_STORE_NAME: &str = "Hawk Leather";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API root. Always ends with `/` so relative joins append.
    pub api_base_url: Url,
    /// Where the session (token + user) is persisted between runs
    pub session_path: PathBuf,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    /// Lifetime of cached catalog responses (zero disables the cache)
    pub catalog_cache_ttl: Duration,
    /// Merchant name passed to the payment gateway
    pub store_name: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let api_base_url = parse_base_url(
            "HAWK_API_BASE_URL",
            &env.get_or_default("HAWK_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;
        let session_path =
            PathBuf::from(env.get_or_default("HAWK_SESSION_PATH", DEFAULT_SESSION_PATH));
        let request_timeout = Duration::from_secs(env.parse_secs(
            "HAWK_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "HAWK_REQUEST_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let catalog_cache_ttl = Duration::from_secs(env.parse_secs(
            "HAWK_CATALOG_CACHE_TTL_SECS",
            DEFAULT_CATALOG_CACHE_TTL_SECS,
        )?);

        Ok(Self {
            api_base_url,
            session_path,
            request_timeout,
            catalog_cache_ttl,
            store_name: env.get_or_default("HAWK_STORE_NAME", DEFAULT_STORE_NAME),
            sentry_dsn: env.get_optional("SENTRY_DSN"),
            sentry_environment: env.get_optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration pointing at `api_base_url` with every other value at its default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL is not a valid http(s) URL.
    pub fn for_base_url(api_base_url: &str) -> Result<Self, ConfigError> {
        let base = api_base_url.to_string();
        Self::from_lookup(move |key| (key == "HAWK_API_BASE_URL").then(|| base.clone()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Thin wrapper over a key lookup.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating blank values as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Parse a whole number of seconds.
    fn parse_secs(&self, key: &str, default: &str) -> Result<u64, ConfigError> {
        self.get_or_default(key, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Parse the API root and normalize it to end with a slash.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

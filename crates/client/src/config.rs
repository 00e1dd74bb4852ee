//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `ATELIER_API_URL` - Backend base URL (default: `http://localhost:8000`)
//! - `ATELIER_SESSION_FILE` - Where the bearer token is persisted
//!   (default: `.atelier/session.json`)
//! - `ATELIER_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend used when `ATELIER_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Session slot used when `ATELIER_SESSION_FILE` is not set.
pub const DEFAULT_SESSION_FILE: &str = ".atelier/session.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL
    pub api_url: Url,
    /// File backing the persisted credential slot
    pub session_file: PathBuf,
    /// Timeout applied to every HTTP request
    pub timeout: Duration,
}

impl ClientConfig {
    /// Configuration pointing at `api_url` with default session file and timeout.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = non_blank(lookup("ATELIER_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_url = parse_api_url(&raw_url)?;

        let session_file = non_blank(lookup("ATELIER_SESSION_FILE"))
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        let timeout = match non_blank(lookup("ATELIER_HTTP_TIMEOUT_SECS")) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("ATELIER_HTTP_TIMEOUT_SECS".to_owned(), e.to_string())
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidEnvVar(
                        "ATELIER_HTTP_TIMEOUT_SECS".to_owned(),
                        "must be greater than zero".to_owned(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_url,
            session_file,
            timeout,
        })
    }
}

impl Default for ClientConfig {
    /// # Panics
    ///
    /// Never in practice: [`DEFAULT_API_URL`] is a valid URL.
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_API_URL).expect("default API URL is valid"))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("ATELIER_API_URL".to_owned(), reason);
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other:?}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.session_file, PathBuf::from(DEFAULT_SESSION_FILE));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_blank_url_falls_back() {
        let config = ClientConfig::from_lookup(lookup(&[("ATELIER_API_URL", "  ")])).unwrap();
        assert_eq!(config.api_url.host_str(), Some("localhost"));
    }

    #[test]
    fn test_explicit_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("ATELIER_API_URL", "https://api.studio.example/"),
            ("ATELIER_SESSION_FILE", "/tmp/atelier-token.json"),
            ("ATELIER_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.api_url.host_str(), Some("api.studio.example"));
        assert_eq!(config.session_file, PathBuf::from("/tmp/atelier-token.json"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_url() {
        let err = ClientConfig::from_lookup(lookup(&[("ATELIER_API_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref name, _) if name == "ATELIER_API_URL"));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        assert!(ClientConfig::from_lookup(lookup(&[("ATELIER_API_URL", "ftp://files.example")])).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(ClientConfig::from_lookup(lookup(&[("ATELIER_HTTP_TIMEOUT_SECS", "0")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[("ATELIER_HTTP_TIMEOUT_SECS", "soon")])).is_err());
    }

    #[test]
    fn test_default_impl_matches_unset_env() {
        let from_env = ClientConfig::from_lookup(lookup(&[])).unwrap();
        let default = ClientConfig::default();
        assert_eq!(from_env.api_url, default.api_url);
        assert_eq!(from_env.timeout, default.timeout);
    }
}

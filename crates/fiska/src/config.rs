//! Client configuration
//!
//! Gathers the settings a [`Client`](crate::Client) needs before it can
//! talk to the API: credentials, the tenant (company) scope, base URL,
//! timeout, and extra default headers. Values come from code or from the
//! `FISKA_*` environment variables.

use std::time::Duration;

use http::HeaderMap;
use secrecy::SecretString;

use crate::error::{Error, Result};

/// Configuration for the API client.
///
/// Token and company are the two values without a usable default; the
/// client builder rejects a config missing either.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bearer token for authentication.
    pub access_token: Option<SecretString>,

    /// Tenant scope; every resource path is nested under this company.
    pub company_id: Option<u64>,

    /// Base URL, [`crate::DEFAULT_BASE_URL`] when unset.
    pub base_url: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Custom headers to include with every request.
    pub default_headers: HeaderMap,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            company_id: None,
            base_url: None,
            timeout: Duration::from_secs(30),
            default_headers: HeaderMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with an access token.
    pub fn with_access_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(SecretString::new(access_token.into().into_boxed_str())),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads:
    /// - `FISKA_ACCESS_TOKEN` for authentication
    /// - `FISKA_COMPANY_ID` for the tenant scope (must be a valid u64)
    /// - `FISKA_BASE_URL` for the API base URL
    /// - `FISKA_TIMEOUT` for the request timeout in seconds (must be a valid u64)
    ///
    /// With the `env` feature a `.env` file in the working directory is
    /// loaded first; already-set process variables win.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] if `FISKA_COMPANY_ID` or
    /// `FISKA_TIMEOUT` are set but not parseable as numbers.
    pub fn from_env() -> Result<Self> {
        use std::env;

        #[cfg(feature = "env")]
        {
            // Ignore a missing or unreadable .env file.
            let _ = dotenvy::dotenv();
        }

        let mut config = Self::default();

        if let Ok(access_token) = env::var("FISKA_ACCESS_TOKEN") {
            config.access_token = Some(SecretString::new(access_token.into_boxed_str()));
        }

        if let Ok(company_id) = env::var("FISKA_COMPANY_ID") {
            let company_id = company_id.parse::<u64>().map_err(|_| {
                Error::MissingConfig(format!(
                    "FISKA_COMPANY_ID must be a numeric company id, got: '{company_id}'"
                ))
            })?;
            config.company_id = Some(company_id);
        }

        if let Ok(base_url) = env::var("FISKA_BASE_URL") {
            config.base_url = Some(base_url);
        }

        if let Ok(timeout) = env::var("FISKA_TIMEOUT") {
            let timeout_secs = timeout.parse::<u64>().map_err(|_| {
                Error::MissingConfig(format!(
                    "FISKA_TIMEOUT must be a number of seconds, got: '{timeout}'"
                ))
            })?;
            config.timeout = Duration::from_secs(timeout_secs);
        }

        Ok(config)
    }

    /// Set the company id.
    pub fn with_company(mut self, company_id: u64) -> Self {
        self.company_id = Some(company_id);
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.access_token.is_none());
        assert!(config.company_id.is_none());
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_from_env_reads_all_variables() {
        temp_env::with_vars(
            [
                ("FISKA_ACCESS_TOKEN", Some("tok-123")),
                ("FISKA_COMPANY_ID", Some("42")),
                ("FISKA_BASE_URL", Some("https://staging.fiska.io/v2")),
                ("FISKA_TIMEOUT", Some("5")),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert!(config.access_token.is_some());
                assert_eq!(config.company_id, Some(42));
                assert_eq!(
                    config.base_url.as_deref(),
                    Some("https://staging.fiska.io/v2")
                );
                assert_eq!(config.timeout, Duration::from_secs(5));
            },
        );
    }

    #[test]
    fn test_from_env_rejects_bad_company_id() {
        temp_env::with_vars([("FISKA_COMPANY_ID", Some("acme"))], || {
            let result = ClientConfig::from_env();
            assert!(matches!(result, Err(Error::MissingConfig(_))));
        });
    }

    #[test]
    fn test_from_env_rejects_bad_timeout() {
        temp_env::with_vars(
            [
                ("FISKA_COMPANY_ID", None::<&str>),
                ("FISKA_TIMEOUT", Some("soon")),
            ],
            || {
                let result = ClientConfig::from_env();
                assert!(matches!(result, Err(Error::MissingConfig(_))));
            },
        );
    }
}

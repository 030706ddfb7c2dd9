//! Client configuration: the auth token and the API base URL.
//!
//! Read once when the client is built. A missing token is not an error here;
//! every operation checks for it before doing anything else.

use std::env;
use std::fmt;

use thiserror::Error;

/// Production API endpoint.
pub const PRODUCTION_BASE_URL: &str = "https://track.delhivery.com";

/// Staging API endpoint.
pub const STAGING_BASE_URL: &str = "https://staging-express.delhivery.com";

pub const AUTH_TOKEN_VAR: &str = "DELHIVERY_AUTH_TOKEN";
pub const BASE_URL_VAR: &str = "DELHIVERY_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("DELHIVERY_AUTH_TOKEN is not configured")]
    MissingCredential,
}

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    auth_token: Option<String>,
    base_url: String,
}

impl ClientConfig {
    /// Production configuration with the given token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            auth_token: normalize_token(Some(token.into())),
            base_url: PRODUCTION_BASE_URL.to_string(),
        }
    }

    /// Production configuration with no token. Every operation will fail
    /// with `ConfigError::MissingCredential`.
    pub fn without_credential() -> Self {
        Self {
            auth_token: None,
            base_url: PRODUCTION_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| PRODUCTION_BASE_URL.to_string());
        Self {
            auth_token: normalize_token(lookup(AUTH_TOKEN_VAR)),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn auth_token(&self) -> Result<&str, ConfigError> {
        self.auth_token
            .as_deref()
            .ok_or(ConfigError::MissingCredential)
    }

    pub fn has_credential(&self) -> bool {
        self.auth_token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn normalize_token(token: Option<String>) -> Option<String> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

//! Client configuration and URL handling
//!
//! Base URL precedence: explicit value > RESERVA_API_BASE env var > TOML
//! config file. A missing base URL is a hard configuration error surfaced
//! before any network call is made.

use std::path::Path;

use serde::Deserialize;

/// Env var holding the backend origin, e.g. `https://api.example.com`
pub const BASE_URL_ENV: &str = "RESERVA_API_BASE";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`crate::ApiClient`].
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Backend origin, scheme required
    pub base_url: String,
    /// Per-request timeout applied by the transport
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    /// Build a config from an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> common::Result<Self> {
        let config = Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };
        config.validate()?;
        Ok(config)
    }

    /// Read the base URL from the `RESERVA_API_BASE` env var.
    ///
    /// Absence or an empty value is a configuration error — there is no
    /// usable default origin to fall back to.
    pub fn from_env() -> common::Result<Self> {
        match std::env::var(BASE_URL_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::new(value.trim().to_owned()),
            _ => Err(common::Error::Config(format!(
                "{BASE_URL_ENV} is not set; set it to the backend origin to enable API calls"
            ))),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> common::Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Join the configured origin with an endpoint path, normalizing to
    /// exactly one slash between them.
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

/// Join a base origin and a path with exactly one separating slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

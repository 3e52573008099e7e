use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "https://metro-backend-2zdt.onrender.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const API_URL_ENV: &str = "SITE_API_URL";
pub const API_TIMEOUT_ENV: &str = "SITE_API_TIMEOUT_SECS";

/// Where the backend lives and how long a request may take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
    timeout: Duration,
}

impl ApiConfig {
    /// # Errors
    ///
    /// Returns `ApiError::Config` when `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url.trim())
            .map_err(|err| ApiError::Config(format!("{base_url}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "{base_url}: expected an http or https URL"
            )));
        }
        if timeout.is_zero() {
            return Err(ApiError::Config("timeout must be positive".into()));
        }
        Ok(Self {
            base_url: parsed,
            timeout,
        })
    }

    /// Reads `SITE_API_URL` and `SITE_API_TIMEOUT_SECS`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` when a variable is set but unusable.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = env::var(API_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        let timeout_secs = match env::var(API_TIMEOUT_ENV) {
            Ok(raw) if !raw.trim().is_empty() => raw.trim().parse::<u64>().map_err(|err| {
                ApiError::Config(format!("{API_TIMEOUT_ENV}={raw}: {err}"))
            })?,
            _ => DEFAULT_TIMEOUT_SECS,
        };
        Self::new(&base_url, Duration::from_secs(timeout_secs))
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Joins an absolute API path (`/api/projects`) onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

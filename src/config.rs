//! Client configuration for the remote auth/user service.

use reqwest::Url;

use crate::error::AuthError;

/// Default backend used by local development setups.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001/api";

/// Environment override for the base URL.
pub const BASE_URL_ENV: &str = "LAMPUS_API_URL";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the service, including the API prefix. Always stored with
    /// a trailing slash so endpoint joins append instead of replacing the
    /// last path segment.
    pub base_url: Url,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL).expect("default base URL parses")
    }
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, AuthError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| AuthError::validation(format!("invalid base URL: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url })
    }

    /// Honor `LAMPUS_API_URL` when set and non-empty, otherwise fall back to
    /// the default local backend.
    pub fn from_env() -> Result<Self, AuthError> {
        match std::env::var(BASE_URL_ENV) {
            Ok(v) if !v.is_empty() => Self::new(&v),
            _ => Ok(Self::default()),
        }
    }

    /// Resolve an endpoint below the API base. Paths are relative, without a
    /// leading slash.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.base_url
            .join(path)
            .map_err(|e| AuthError::validation(format!("invalid endpoint `{path}`: {e}")))
    }
}

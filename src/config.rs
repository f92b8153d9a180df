//! Configuration options for the storefront client

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Name under which the bearer token is persisted
pub const DEFAULT_TOKEN_KEY: &str = "storefront_token";

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Configuration options for the storefront client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the storefront backend, without the `/api` prefix
    pub base_url: String,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Key the bearer token is stored under
    pub token_key: String,

    /// File holding persisted tokens. `None` means the user's config directory.
    pub token_path: Option<PathBuf>,

    /// Value sent as the `User-Agent` header
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            token_path: None,
            user_agent: format!("storefront-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientOptions {
    /// Read options from `STOREFRONT_API_URL`, `STOREFRONT_TOKEN_PATH` and
    /// `STOREFRONT_TIMEOUT_SECS`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(url) = env::var("STOREFRONT_API_URL") {
            options = options.with_base_url(&url);
        }

        if let Ok(path) = env::var("STOREFRONT_TOKEN_PATH") {
            options = options.with_token_path(path);
        }

        if let Ok(secs) = env::var("STOREFRONT_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::config(format!("STOREFRONT_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            options = options.with_request_timeout(if secs == 0 {
                None
            } else {
                Some(Duration::from_secs(secs))
            });
        }

        Ok(options)
    }

    /// Set the backend base URL
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the key the token is persisted under
    pub fn with_token_key(mut self, value: &str) -> Self {
        self.token_key = value.to_string();
        self
    }

    /// Set the token file location
    pub fn with_token_path(mut self, value: impl Into<PathBuf>) -> Self {
        self.token_path = Some(value.into());
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, value: &str) -> Self {
        self.user_agent = value.to_string();
        self
    }

    /// The token file, resolving the default location when none was set
    pub fn resolved_token_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.token_path {
            return Ok(path.clone());
        }

        dirs::config_dir()
            .map(|dir| dir.join("storefront").join("session.json"))
            .ok_or_else(|| Error::config("no config directory available for the token file"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_trims_trailing_slash() {
        let options = ClientOptions::default()
            .with_base_url("https://shop.example.com/")
            .with_token_key("custom")
            .with_request_timeout(None);

        assert_eq!(options.base_url, "https://shop.example.com");
        assert_eq!(options.token_key, "custom");
        assert!(options.request_timeout.is_none());
    }

    #[test]
    fn explicit_token_path_wins() {
        let options = ClientOptions::default().with_token_path("/tmp/storefront.json");
        assert_eq!(
            options.resolved_token_path().unwrap(),
            PathBuf::from("/tmp/storefront.json")
        );
    }
}

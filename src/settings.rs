//! Process-wide settings read once at startup.
//!
//! Everything here is either a compile-time constant or a value taken from the
//! environment when [`Settings::from_env`] runs. Nothing is mutated afterwards.

use crate::error::{MetadataError, Result};
use std::time::Duration;

/// Release version stamped into the user agent
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hosting API host
pub const GITHUB_API_HOST: &str = "api.github.com";

/// Port the hosting API is reached on
pub const GITHUB_API_PORT: u16 = 443;

/// Default timeout applied to every request
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Variable holding the API bearer token
pub const TOKEN_ENV_VAR: &str = "GITHUB_API_TOKEN";

/// Log level variable shared with the rest of the runtime-init toolchain
pub const LOG_LEVEL_ENV_VAR: &str = "F5_SDK_LOG_LEVEL";

/// Certificate verification toggle shared with the rest of the toolchain.
///
/// Reserved: the generator never verifies certificates and does not read it.
pub const DISABLE_CERT_VERIFY_ENV_VAR: &str = "F5_DISABLE_CERT_VERIFY";

/// Config file looked up next to the executable
pub const EXTENSION_INFO: &str = "extension_info.json";

/// Output file written to the working directory
pub const OUTPUT_FILE: &str = "metadata.json";

/// User agent sent with every request
pub fn user_agent() -> String {
    format!("f5-bigip-runtime-init/{}", VERSION)
}

/// Connection settings for the hosting API
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub token: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub verify_certificates: bool,
}

impl Settings {
    /// Build settings for `api.github.com` with the given token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: format!("https://{}:{}", GITHUB_API_HOST, GITHUB_API_PORT),
            token: token.into(),
            user_agent: user_agent(),
            timeout: HTTP_TIMEOUT,
            verify_certificates: false,
        }
    }

    /// Read the bearer token from `GITHUB_API_TOKEN`
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or(MetadataError::MissingToken { var: TOKEN_ENV_VAR })?;
        Ok(Self::new(token))
    }

    /// Point the client at another host (self-hosted API, local stub)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::new("secret");
        assert_eq!(settings.base_url, "https://api.github.com:443");
        assert_eq!(settings.user_agent, user_agent());
        assert_eq!(settings.timeout, Duration::from_secs(60));
        assert!(!settings.verify_certificates);
    }

    #[test]
    fn test_user_agent_tracks_package_version() {
        assert_eq!(
            user_agent(),
            format!("f5-bigip-runtime-init/{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let settings = Settings::new("secret").with_base_url("http://127.0.0.1:8080/");
        assert_eq!(settings.base_url, "http://127.0.0.1:8080");
    }
}

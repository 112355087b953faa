//! Platform configuration: base URL, partner credentials and the debug toggle.
//!
//! A `PlatformConfig` is passed explicitly to `EventClient::new`. For callers
//! that prefer a single process-wide setting, `set_default` installs one and
//! `default_config` hands it back, loading it from the environment on first
//! use when nothing was installed.

use std::env;
use std::fmt;
use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dotenvy::dotenv;

use crate::error::ApiError;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.moxiworks.com";

pub const ENV_IDENTIFIER: &str = "MOXI_PLATFORM_IDENTIFIER";
pub const ENV_SECRET: &str = "MOXI_PLATFORM_SECRET";
pub const ENV_URL: &str = "MOXI_PLATFORM_URL";
pub const ENV_DEBUG: &str = "MOXI_PLATFORM_DEBUG";

static DEFAULT: OnceLock<PlatformConfig> = OnceLock::new();

#[derive(Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    pub base_url: String,
    pub platform_identifier: String,
    pub platform_secret: String,
    /// Log raw responses at debug level.
    pub debug: bool,
}

impl PlatformConfig {
    pub fn new(platform_identifier: &str, platform_secret: &str) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            platform_identifier: platform_identifier.to_string(),
            platform_secret: platform_secret.to_string(),
            debug: false,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Load configuration from the environment, reading `.env` if present.
    pub fn from_env() -> Result<Self, ApiError> {
        dotenv().ok();

        let identifier = env::var(ENV_IDENTIFIER).map_err(|_| env_error(ENV_IDENTIFIER))?;
        let secret = env::var(ENV_SECRET).map_err(|_| env_error(ENV_SECRET))?;

        let mut config = Self::new(&identifier, &secret);
        if let Ok(url) = env::var(ENV_URL) {
            config.base_url = url;
        }
        if let Ok(debug) = env::var(ENV_DEBUG) {
            config.debug = parse_flag(&debug);
        }
        Ok(config)
    }

    /// Value of the `authorization` header sent with every request.
    pub fn authorization_header(&self) -> Result<String, ApiError> {
        if self.platform_identifier.is_empty() || self.platform_secret.is_empty() {
            return Err(ApiError::Config(
                "platform identifier and secret must be set".to_string(),
            ));
        }
        let credentials = format!("{}:{}", self.platform_identifier, self.platform_secret);
        Ok(format!("Basic {}", STANDARD.encode(credentials)))
    }
}

impl fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("base_url", &self.base_url)
            .field("platform_identifier", &self.platform_identifier)
            .field("platform_secret", &"<redacted>")
            .field("debug", &self.debug)
            .finish()
    }
}

/// Install the process-wide configuration. Fails if one is already set.
pub fn set_default(config: PlatformConfig) -> Result<(), ApiError> {
    DEFAULT
        .set(config)
        .map_err(|_| ApiError::Config("default platform configuration already set".to_string()))
}

/// The process-wide configuration, loaded from the environment if unset.
pub fn default_config() -> Result<&'static PlatformConfig, ApiError> {
    if let Some(config) = DEFAULT.get() {
        return Ok(config);
    }
    let loaded = PlatformConfig::from_env()?;
    Ok(DEFAULT.get_or_init(|| loaded))
}

fn env_error(var: &str) -> ApiError {
    ApiError::Config(format!("missing environment variable: {var}"))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_production_url() {
        let config = PlatformConfig::new("id", "secret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.debug);
    }

    #[test]
    fn authorization_header_is_basic_auth() {
        let config = PlatformConfig::new("abc", "xyz");
        // base64("abc:xyz")
        assert_eq!(config.authorization_header().unwrap(), "Basic YWJjOnh5eg==");
    }

    #[test]
    fn authorization_header_requires_credentials() {
        let err = PlatformConfig::new("", "secret").authorization_header().unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
        let err = PlatformConfig::new("id", "").authorization_header().unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = PlatformConfig::new("id", "hunter2");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn flags_parse_loosely() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}

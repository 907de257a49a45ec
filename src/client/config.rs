//! Configuration management for the API client

use std::{path::PathBuf, time::Duration};

use compact_str::{CompactString, format_compact};

use super::error::{ClientError, Result};

/// Main configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host and optional path prefix, without scheme (e.g. `api.example.com/v1`)
    pub base_url: CompactString,
    /// Static token sent as the `token` query parameter
    pub token: CompactString,
    /// Use `https://` instead of `http://`
    pub secure: bool,
    /// Value of the `format` query parameter
    pub output: CompactString,
    /// Include request URL and response body in API error reports
    pub verbose: bool,
    /// Request configuration
    pub request: RequestConfig,
    /// Debug configuration
    pub debug: DebugConfig,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Request timeout
    pub timeout: Duration,
}

/// Debug and logging configuration
#[derive(Debug, Clone, Default)]
pub struct DebugConfig {
    /// Write every response body to `log_directory`
    pub log_responses: bool,
    /// Directory for storing response dumps
    pub log_directory: Option<PathBuf>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30) }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<CompactString>, token: impl Into<CompactString>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            secure: true,
            output: "json".into(),
            verbose: false,
            request: RequestConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure { "https://" } else { "http://" }
    }

    /// Validate the configuration
    ///
    /// Never called implicitly; a misconfigured client only fails once a
    /// request is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::config_validation("host", "Base URL cannot be empty"));
        }

        if self.base_url.starts_with("http://") || self.base_url.starts_with("https://") {
            return Err(ClientError::config_validation(
                "host",
                "Base URL must not include a scheme, use the secure flag instead",
            ));
        }

        if url::Url::parse(&format_compact!("{}{}", self.scheme(), self.base_url)).is_err() {
            return Err(ClientError::config_validation(
                "host",
                "Base URL is not a valid URL format",
            ));
        }

        if self.output.is_empty() {
            return Err(ClientError::config_validation("format", "Output format cannot be empty"));
        }

        if self.request.timeout.is_zero() {
            return Err(ClientError::config_validation(
                "timeout",
                "Timeout must be greater than zero",
            ));
        }

        Ok(())
    }
}

impl ClientConfig {
    /// Set transport security
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set output format label
    pub fn with_output(mut self, output: impl Into<CompactString>) -> Self {
        self.output = output.into();
        self
    }

    /// Set verbose error reports
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set request configuration
    pub fn with_request(mut self, request: RequestConfig) -> Self {
        self.request = request;
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = timeout;
        self
    }

    /// Set debug configuration
    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new("api.example.com", "T");
        assert!(config.secure);
        assert_eq!(config.output, "json");
        assert!(!config.verbose);
        assert_eq!(config.request.timeout, Duration::from_secs(30));
        assert!(!config.debug.log_responses);
        assert_eq!(config.scheme(), "https://");
        assert_eq!(config.with_secure(false).scheme(), "http://");
    }

    #[test]
    fn validate_accepts_host_with_path() {
        assert!(ClientConfig::new("api.example.com/v1", "T").validate().is_ok());
        assert!(ClientConfig::new("localhost:8000/api", "").validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let field = |config: ClientConfig| match config.validate() {
            Err(ClientError::ConfigValidation { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        };

        assert_eq!(field(ClientConfig::new("", "T")), "host");
        assert_eq!(field(ClientConfig::new("https://api.example.com", "T")), "host");
        assert_eq!(field(ClientConfig::new("api.example.com", "T").with_output("")), "format");
        assert_eq!(
            field(ClientConfig::new("api.example.com", "T").with_timeout(Duration::ZERO)),
            "timeout"
        );
    }
}

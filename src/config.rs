//! File backed configuration for the `vb-api` binary

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use compact_str::CompactString;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::{
    client::{ClientConfig, DebugConfig, RequestConfig},
    result::{Result, VbError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VbConfig {
    pub host: CompactString,
    pub token: CompactString,
    pub secure: bool,
    pub output: CompactString,
    pub verbose: bool,
    pub timeout_secs: u64,
    pub log_level: Option<CompactString>,
    /// Dump every response body into this directory
    pub response_log_dir: Option<PathBuf>,
}

impl Default for VbConfig {
    fn default() -> Self {
        Self {
            host: CompactString::default(),
            token: CompactString::default(),
            secure: true,
            output: "json".into(),
            verbose: false,
            timeout_secs: 30,
            log_level: None,
            response_log_dir: None,
        }
    }
}

impl From<VbConfig> for ClientConfig {
    fn from(config: VbConfig) -> Self {
        let debug = DebugConfig {
            log_responses: config.response_log_dir.is_some(),
            log_directory: config.response_log_dir,
        };

        Self::new(config.host, config.token)
            .with_secure(config.secure)
            .with_output(config.output)
            .with_verbose(config.verbose)
            .with_request(RequestConfig { timeout: Duration::from_secs(config.timeout_secs) })
            .with_debug(debug)
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("vb-api.toml")
    } else {
        PathBuf::from("vb-api.toml")
    }
}

/// Load the configuration file, falling back to defaults when it is missing
pub fn load_config(config_file: &Path) -> Result<VbConfig> {
    if !config_file.exists() {
        return Ok(VbConfig::default());
    }

    confy::load_path(config_file)
        .map_err(|e| VbError::config_load_error(config_file.to_path_buf(), e))
}

pub fn save_config(config_file: &Path, config: &VbConfig) -> Result<()> {
    confy::store_path(config_file, config)
        .map_err(|e| VbError::config_save_error(config_file.to_path_buf(), e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_into_client_config() {
        let config = VbConfig {
            host: "api.example.com".into(),
            token: "T".into(),
            secure: false,
            output: "api".into(),
            verbose: true,
            timeout_secs: 5,
            log_level: None,
            response_log_dir: Some(PathBuf::from("responses")),
        };

        let client = ClientConfig::from(config);
        assert_eq!(client.base_url, "api.example.com");
        assert_eq!(client.token, "T");
        assert!(!client.secure);
        assert_eq!(client.output, "api");
        assert!(client.verbose);
        assert_eq!(client.request.timeout, Duration::from_secs(5));
        assert!(client.debug.log_responses);
        assert_eq!(client.debug.log_directory, Some(PathBuf::from("responses")));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("vb-api-does-not-exist/vb-api.toml");
        assert_eq!(load_config(&path).unwrap(), VbConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("vb-api-config-{}", std::process::id()));
        let path = dir.join("vb-api.toml");
        let config = VbConfig {
            host: "localhost:8000".into(),
            token: "abc".into(),
            secure: false,
            ..Default::default()
        };

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);

        std::fs::remove_dir_all(dir).unwrap();
    }
}

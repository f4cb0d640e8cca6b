//! YAML configuration with defaults.
//!
//! DESIGN
//! ======
//! Every section carries `serde(default)`, so a partial file only overrides
//! the keys it names. A missing file is not an error: defaults are written
//! to that path so operators have a template to edit.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_CONFIG_PATH: &str = "config/syncx.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("error reading config file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("error parsing config file {path}: {source}")]
    Parse { path: String, source: serde_yaml::Error },
    #[error("error creating config directory: {0}")]
    CreateDir(std::io::Error),
    #[error("error serializing config: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("error writing config file: {0}")]
    Write(std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub projects: ProjectsConfig,
    pub database: DatabaseConfig,
    pub balancer: BalancerConfig,
    pub scanning: ScanningConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8080 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectsConfig {
    /// Directory hosted repositories are cloned into.
    pub directory: String,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self { directory: "./projects".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "./syncx.db".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    pub endpoints: Vec<String>,
    pub check_interval_secs: u64,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["http://localhost:8081".into(), "http://localhost:8082".into()],
            check_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    pub auto_scan_on_add: bool,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self { auto_scan_on_add: true }
    }
}

impl Config {
    /// Apply environment overrides on top of file values.
    ///
    /// - `PORT`: replaces `server.port` when it parses as `u16`
    pub fn apply_env(&mut self) {
        self.server.port = env_parse("PORT", self.server.port);
    }

    /// `host:port` listen address.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Load configuration from `path`, writing defaults there when it is missing.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read or parsed. Failing to
/// write the default file is logged and tolerated.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let path_str = path.display().to_string();

    if !path.exists() {
        let config = Config::default();
        match save_config(&config, path) {
            Ok(()) => info!(path = %path_str, "created default configuration"),
            Err(e) => warn!(path = %path_str, error = %e, "could not save default configuration"),
        }
        return Ok(config);
    }

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path_str.clone(), source })?;
    let config = parse_config(&raw).map_err(|source| ConfigError::Parse { path: path_str.clone(), source })?;
    info!(path = %path_str, "loaded configuration");
    Ok(config)
}

/// Parse YAML over the defaults. Empty input yields the defaults.
///
/// # Errors
///
/// Returns the YAML error for malformed input.
pub fn parse_config(raw: &str) -> Result<Config, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(raw)
}

/// Write `config` as YAML, creating the parent directory.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(ConfigError::CreateDir)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml).map_err(ConfigError::Write)
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

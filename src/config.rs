//! Configuration for toposcope.
//!
//! Settings merge in order: built-in defaults, then a discovered YAML config
//! file, then CLI flags. Place a `.toposcope.yaml` in your project root or
//! `~/.config/toposcope/`:
//!
//! ```yaml
//! endpoint: http://localhost:8000/api/topology
//! timeout_secs: 30
//! theme: dark
//! ```

use crate::error::{ErrorContext, Result, TopoError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default scan endpoint, matching the backend's local dev address.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/topology";

/// Default scan timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".toposcope.yaml",
    ".toposcope.yml",
    "toposcope.yaml",
    "toposcope.yml",
];

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Scan endpoint URL
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Theme name: "dark" or "light"
    pub theme: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            theme: "dark".to_string(),
        }
    }
}

impl AppConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(TopoError::config("endpoint must not be empty"));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(TopoError::config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.timeout_secs == 0 {
            return Err(TopoError::config("timeout_secs must be at least 1"));
        }
        if !matches!(self.theme.as_str(), "dark" | "light") {
            return Err(TopoError::config(format!(
                "unknown theme '{}' (expected dark or light)",
                self.theme
            )));
        }
        Ok(())
    }
}

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/toposcope/)
/// 4. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(path) = find_config_in_dir(&cwd) {
            return Some(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        if let Some(path) = find_config_in_dir(&config_dir.join("toposcope")) {
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        if let Some(path) = find_config_in_dir(&home) {
            return Some(path);
        }
    }

    None
}

fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Load an [`AppConfig`] from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| TopoError::io(path, e))?;
    let config: AppConfig = serde_yaml::from_str(&content)
        .map_err(|e| TopoError::config(e.to_string()))
        .with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

/// Generate an example config file with defaults and comments.
#[must_use]
pub fn generate_example_config() -> String {
    format!(
        "# toposcope configuration\n\
         # Scan endpoint serving the inventory JSON\n\
         endpoint: {DEFAULT_ENDPOINT}\n\
         # Request timeout in seconds\n\
         timeout_secs: {DEFAULT_TIMEOUT_SECS}\n\
         # Theme: dark or light\n\
         theme: dark\n"
    )
}

//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. Environment (`CDP_MODE`, `CDP_API_URL`, `CDP_API_TOKEN`)
//! 4. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `--config <path>` if given (must exist)
//! 2. `$CITYCATALYST_CDP_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/citycatalyst/cdp.toml`
//! 4. `~/.citycatalyst/cdp.toml`
//!
//! # Example
//!
//! ```
//! use citycatalyst_cdp::core::config::Config;
//! use citycatalyst_cdp::core::types::ReportingMode;
//!
//! let config = Config::from_toml_str("mode = \"disabled\"").unwrap();
//! assert_eq!(config.mode(), ReportingMode::Disabled);
//! assert_eq!(config.timeout().as_secs(), 30);
//! ```

pub mod schema;

pub use schema::{FileConfig, ServerConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::types::ReportingMode;
use crate::report::layout::QuestionnaireLayout;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CITYCATALYST_CDP_CONFIG";

/// Default per-call timeout for the CDP API.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file '{0}' does not exist")]
    Missing(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Effective configuration.
///
/// Accessor methods apply defaults, so callers never deal with `Option`
/// for settings that have one.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values from the file, with environment overrides applied
    pub file: FileConfig,
    /// Path to the config file (if loaded)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `explicit` or the default locations, then
    /// apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path is missing, or a config file
    /// exists but cannot be parsed or validated. A missing default file is
    /// not an error (defaults are used).
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let path = match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::Missing(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_default(),
        };

        let file = match &path {
            Some(path) => {
                let file = Self::read_file(path)?;
                if file.api_token.is_some() {
                    warnings.push(ConfigWarning {
                        message: "api_token is stored in plain text; prefer CDP_API_TOKEN"
                            .to_string(),
                        path: path.clone(),
                    });
                }
                file
            }
            None => FileConfig::default(),
        };

        let config = Config { file, path }.with_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(ConfigLoadResult { config, warnings })
    }

    /// Parse configuration from TOML text, without environment overrides.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })?;
        let config = Config { file, path: None };
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `CDP_MODE` is not a mode name.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(mode) = lookup("CDP_MODE") {
            let mode = mode
                .parse::<ReportingMode>()
                .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
            self.file.mode = Some(mode);
        }
        if let Some(base) = lookup("CDP_API_URL") {
            self.file.api_base = Some(base);
        }
        if let Some(token) = lookup("CDP_API_TOKEN") {
            self.file.api_token = Some(token);
        }
        Ok(self)
    }

    /// Validate the effective configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.file.validate()
    }

    /// Find the first existing config file in the default locations.
    fn find_default() -> Option<PathBuf> {
        // 1. Check $CITYCATALYST_CDP_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/citycatalyst/cdp.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("citycatalyst/cdp.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.citycatalyst/cdp.toml
        dirs::home_dir()
            .map(|home| home.join(".citycatalyst/cdp.toml"))
            .filter(|path| path.exists())
    }

    /// Read and parse a config file.
    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Path of the loaded config file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reporting mode. Defaults to `disabled`.
    pub fn mode(&self) -> ReportingMode {
        self.file.mode.unwrap_or_default()
    }

    /// CDP API base URL.
    pub fn api_base(&self) -> Option<&str> {
        self.file.api_base.as_deref()
    }

    /// CDP API token.
    pub fn api_token(&self) -> Option<&str> {
        self.file.api_token.as_deref()
    }

    /// Timeout for each CDP call. Defaults to 30 seconds.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// HTTP listen address. Defaults to `127.0.0.1:3000`.
    pub fn bind(&self) -> &str {
        self.file
            .server
            .as_ref()
            .and_then(|s| s.bind.as_deref())
            .unwrap_or(DEFAULT_BIND)
    }

    /// Inventory fixture file, if configured.
    pub fn data_path(&self) -> Option<&Path> {
        self.file
            .server
            .as_ref()
            .and_then(|s| s.data.as_deref())
    }

    /// Questionnaire layout. Defaults to the built-in layout.
    pub fn layout(&self) -> QuestionnaireLayout {
        self.file.layout.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.mode(), ReportingMode::Disabled);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.bind(), DEFAULT_BIND);
        assert!(config.api_base().is_none());
        assert!(config.data_path().is_none());
        assert_eq!(config.layout(), QuestionnaireLayout::default());
    }

    #[test]
    fn env_overrides_file() {
        let config = Config::from_toml_str("mode = \"disabled\"")
            .unwrap()
            .with_env_overrides(env(&[
                ("CDP_MODE", "test"),
                ("CDP_API_URL", "https://cdp.example.org"),
                ("CDP_API_TOKEN", "tok"),
            ]))
            .unwrap();

        assert_eq!(config.mode(), ReportingMode::Test);
        assert_eq!(config.api_base(), Some("https://cdp.example.org"));
        assert_eq!(config.api_token(), Some("tok"));
        config.validate().unwrap();
    }

    #[test]
    fn bad_env_mode_is_rejected() {
        let result = Config::default().with_env_overrides(env(&[("CDP_MODE", "live")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn from_toml_str_validates() {
        assert!(Config::from_toml_str("mode = \"test\"").is_err());
        assert!(Config::from_toml_str("mode = [").is_err());
    }

    #[test]
    fn load_explicit_file_warns_about_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cdp.toml");
        fs::write(
            &path,
            "mode = \"production\"\napi_token = \"secret\"\ntimeout_secs = 3\n",
        )
        .unwrap();

        let result = Config::load(Some(&path)).unwrap();

        assert_eq!(result.config.path(), Some(path.as_path()));
        assert_eq!(result.config.timeout(), Duration::from_secs(3));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("CDP_API_TOKEN"));
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cdp.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        match Config::load(Some(&path)) {
            Err(ConfigError::ParseError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}

//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Example
//!
//! ```toml
//! mode = "test"
//! api_base = "https://cdp-test.example.org/api/v1"
//! timeout_secs = 20
//!
//! [server]
//! bind = "0.0.0.0:8080"
//! data = "/var/lib/citycatalyst/inventories.json"
//! ```
//!
//! A `[layout]` table replaces the built-in questionnaire layout; see
//! [`QuestionnaireLayout`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::ReportingMode;
use crate::report::layout::QuestionnaireLayout;

/// Contents of a config file. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Reporting mode (default: disabled)
    pub mode: Option<ReportingMode>,

    /// CDP API base URL; required in test mode
    pub api_base: Option<String>,

    /// CDP API token. Prefer the `CDP_API_TOKEN` environment variable.
    pub api_token: Option<String>,

    /// Timeout applied to each CDP call, in seconds (default: 30)
    pub timeout_secs: Option<u64>,

    /// HTTP server settings
    pub server: Option<ServerConfig>,

    /// Questionnaire layout override
    pub layout: Option<QuestionnaireLayout>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on (default: 127.0.0.1:3000)
    pub bind: Option<String>,

    /// Inventory fixture file served by the in-memory store
    pub data: Option<PathBuf>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be greater than zero".into(),
            ));
        }

        if self.mode == Some(ReportingMode::Test) {
            match self.api_base.as_deref() {
                None => {
                    return Err(ConfigError::InvalidValue(
                        "mode 'test' requires api_base".into(),
                    ))
                }
                Some(base) if !base.starts_with("http://") && !base.starts_with("https://") => {
                    return Err(ConfigError::InvalidValue(format!(
                        "api_base '{}' must be an http(s) URL",
                        base
                    )))
                }
                Some(_) => {}
            }
        }

        if let Some(bind) = self.server.as_ref().and_then(|s| s.bind.as_deref()) {
            bind.parse::<std::net::SocketAddr>().map_err(|_| {
                ConfigError::InvalidValue(format!("bind '{}' is not a socket address", bind))
            })?;
        }

        if let Some(layout) = &self.layout {
            layout
                .validate()
                .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        }

        Ok(())
    }
}

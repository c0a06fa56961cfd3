//! Configuration management for preflight
//!
//! Settings come from environment variables with defaults. Values are read when
//! `PreflightConfig::default()` is called and never cached beyond that value.
//!
//! # Environment Variables
//!
//! - `DOCKER_HOST`: container-runtime socket override, `unix://<path>` - optional
//! - `PREFLIGHT_PROBE_TIMEOUT`: probe timeout in seconds - default: "8"
//! - `PREFLIGHT_LOG_LEVEL`: logging level - default: "info"
//! - `PREFLIGHT_PROVIDERS_FILE`: YAML file listing providers to probe - optional
//! - `REQUIRE_AUTH`: "true" when endpoints that trigger probing are behind
//!   authentication. Reported only; enforcement lives outside this crate.
//!
//! # Providers File
//!
//! ```yaml
//! providers:
//!   - name: openai
//!     base_url: https://api.openai.com/v1
//!     api_key_env: OPENAI_API_KEY
//!     model: gpt-4o-mini
//!   - name: gemini
//!     base_url: https://generativelanguage.googleapis.com
//!     api_key_env: GOOGLE_API_KEY
//!     provider: gemini
//! ```

use crate::probe::{NamedProbe, ProbeRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 8;
const MAX_PROBE_TIMEOUT_SECS: u64 = 600;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    /// Providers file could not be read or parsed
    #[error("Failed to load providers file {path}: {error}")]
    ProvidersFile { path: PathBuf, error: String },
}

/// Main configuration structure for preflight
#[derive(Debug, Clone)]
pub struct PreflightConfig {
    /// Raw `DOCKER_HOST`
    pub docker_host: Option<String>,

    /// Probe timeout in seconds
    pub probe_timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Providers file to probe when none is given on the command line
    pub providers_file: Option<PathBuf>,

    /// Whether the surrounding service requires authentication
    pub require_auth: bool,
}

impl Default for PreflightConfig {
    /// Loads from environment variables, falling back to defaults
    fn default() -> Self {
        let docker_host = env::var("DOCKER_HOST").ok().filter(|v| !v.trim().is_empty());

        let probe_timeout_secs = env::var("PREFLIGHT_PROBE_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS);

        let log_level = env::var("PREFLIGHT_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let providers_file = env::var("PREFLIGHT_PROVIDERS_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        // Only the exact string enables it
        let require_auth = env::var("REQUIRE_AUTH").map(|v| v == "true").unwrap_or(false);

        Self {
            docker_host,
            probe_timeout_secs,
            log_level,
            providers_file,
            require_auth,
        }
    }
}

impl PreflightConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` for a zero or over-long timeout
    /// or an unknown log level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Probe timeout must be at least 1 second".to_string(),
            ));
        }
        if self.probe_timeout_secs > MAX_PROBE_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Probe timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert(
            "docker_host".to_string(),
            self.docker_host
                .clone()
                .unwrap_or_else(|| "not set".to_string()),
        );
        map.insert(
            "probe_timeout_secs".to_string(),
            self.probe_timeout_secs.to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());
        if let Some(ref file) = self.providers_file {
            map.insert("providers_file".to_string(), file.display().to_string());
        }
        map.insert("require_auth".to_string(), self.require_auth.to_string());

        map
    }
}

impl fmt::Display for PreflightConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Preflight Configuration:")?;
        writeln!(
            f,
            "  DOCKER_HOST: {}",
            self.docker_host.as_deref().unwrap_or("not set")
        )?;
        writeln!(f, "  Probe Timeout: {}s", self.probe_timeout_secs)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        if let Some(ref file) = self.providers_file {
            writeln!(f, "  Providers File: {}", file.display())?;
        }
        writeln!(f, "  Require Auth: {}", self.require_auth)?;
        Ok(())
    }
}

/// One provider entry of a providers file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable holding the key, used when `api_key` is absent
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Provider hint that selects the wire format
    #[serde(default)]
    pub provider: Option<String>,
}

impl ProviderEntry {
    /// Resolves the key and builds the probe. A missing key env var yields an
    /// empty key; the endpoint decides whether that is acceptable.
    pub fn to_probe(&self) -> NamedProbe {
        let api_key = self
            .api_key
            .clone()
            .or_else(|| {
                self.api_key_env
                    .as_deref()
                    .and_then(|var| env::var(var).ok())
            })
            .unwrap_or_default();

        NamedProbe {
            name: self.name.clone(),
            request: ProbeRequest {
                base_url: self.base_url.clone(),
                api_key,
                model: self.model.clone(),
                provider_hint: self.provider.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersFile {
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
}

impl ProvidersFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProvidersFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| match e {
            ConfigError::ParseError { error, .. } => ConfigError::ProvidersFile {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            field: "providers".to_string(),
            error: e.to_string(),
        })
    }

    pub fn probes(&self) -> Vec<NamedProbe> {
        self.providers.iter().map(ProviderEntry::to_probe).collect()
    }
}

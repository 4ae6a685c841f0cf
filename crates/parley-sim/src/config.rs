//! Configuration for the `parley-sim` driver.
//!
//! The configuration lives in `parley-config.yaml` in the working directory,
//! or wherever `PARLEY_CONFIG` points. Every section is optional and falls
//! back to its defaults, so an empty file is a valid configuration.
//!
//! The conflict rule tables are compiled into the engine and are not
//! configurable here.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable naming an alternate config file.
pub const CONFIG_PATH_ENV: &str = "PARLEY_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "parley-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level driver configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimConfig {
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where the batch and roster are read from.
    #[serde(default)]
    pub input: InputConfig,
}

impl SimConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for input paths:
    /// - `PARLEY_BATCH_PATH` overrides `input.batch_path`
    /// - `PARLEY_ROSTER_PATH` overrides `input.roster_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null, not as an empty mapping.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.input.apply_env_overrides();
        Ok(config)
    }
}

/// The config file to load: `PARLEY_CONFIG` if set, else the default name.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Input file locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputConfig {
    /// JSON file holding one turn's `SimulationBatch`.
    #[serde(default = "default_batch_path")]
    pub batch_path: PathBuf,

    /// JSON file holding the array of known actors.
    #[serde(default = "default_roster_path")]
    pub roster_path: PathBuf,
}

impl InputConfig {
    /// Apply environment variable overrides to input paths.
    ///
    /// Reads `PARLEY_BATCH_PATH` and `PARLEY_ROSTER_PATH`. Only overrides a
    /// field when the corresponding variable is set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var_os(name).map(PathBuf::from));
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<PathBuf>) {
        if let Some(path) = lookup("PARLEY_BATCH_PATH") {
            self.batch_path = path;
        }
        if let Some(path) = lookup("PARLEY_ROSTER_PATH") {
            self.roster_path = path;
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            batch_path: default_batch_path(),
            roster_path: default_roster_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_batch_path() -> PathBuf {
    PathBuf::from("batch.json")
}

fn default_roster_path() -> PathBuf {
    PathBuf::from("roster.json")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert_eq!(config.input.batch_path, PathBuf::from("batch.json"));
        assert_eq!(config.input.roster_path, PathBuf::from("roster.json"));
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
logging:
  level: "debug"
  json: true

input:
  batch_path: "turns/turn-0042.json"
  roster_path: "turns/roster.json"
"#;
        let mut config: SimConfig = serde_yml::from_str(yaml).unwrap();
        config.input.apply_overrides(|_| None);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.input.batch_path, PathBuf::from("turns/turn-0042.json"));
        assert_eq!(config.input.roster_path, PathBuf::from("turns/roster.json"));
    }

    #[test]
    fn partial_yaml_keeps_section_defaults() {
        let config: SimConfig = serde_yml::from_str("logging:\n  json: true\n").unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.json);
        assert_eq!(config.input, InputConfig::default());
    }

    #[test]
    fn empty_document_is_default() {
        let config = SimConfig::parse("   \n").unwrap();
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = SimConfig::parse("logging: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = SimConfig::from_file(Path::new("/nonexistent/parley-config.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn overrides_replace_only_set_paths() {
        let mut input = InputConfig::default();
        input.apply_overrides(|name| {
            (name == "PARLEY_ROSTER_PATH").then(|| PathBuf::from("/srv/roster.json"))
        });
        assert_eq!(input.batch_path, PathBuf::from("batch.json"));
        assert_eq!(input.roster_path, PathBuf::from("/srv/roster.json"));
    }
}

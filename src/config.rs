//! Planner configuration file support
//!
//! Handles parsing of `.ingest-mode.toml` configuration files and
//! environment variable overrides. File loading requires the `config` feature.

use crate::models::CaseConversion;
use serde::{Deserialize, Serialize};
#[cfg(feature = "config")]
use std::path::Path;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".ingest-mode.toml";

/// Environment variable for the case conversion applied to names
pub const ENV_CASE_CONVERSION: &str = "INGEST_MODE_CASE_CONVERSION";

/// Environment variable toggling optimization column derivation
pub const ENV_OPTIMIZATION_COLUMNS: &str = "INGEST_MODE_OPTIMIZATION_COLUMNS";

/// Errors that can occur while loading or saving the configuration
#[derive(Debug, thiserror::Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Config error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Planner configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerSection {
    /// Naming convention applied to the mode and datasets before planning
    #[serde(default)]
    pub case_conversion: CaseConversion,

    /// Derive the main schema when the main dataset has no fields
    #[serde(default = "default_true")]
    pub derive_main_schema: bool,

    /// Derive optimization filters for delta loads
    #[serde(default = "default_true")]
    pub optimization_columns: bool,

    /// Add the temp datasets bitemporal delta loads need
    #[serde(default = "default_true")]
    pub temp_datasets: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            case_conversion: CaseConversion::default(),
            derive_main_schema: true,
            optimization_columns: true,
            temp_datasets: true,
        }
    }
}

/// Main configuration structure
///
/// Represents the `.ingest-mode.toml` configuration file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlannerConfig {
    /// Planner configuration
    #[serde(default)]
    pub planner: PlannerSection,
}

impl PlannerConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration applying `case_conversion` to every name
    pub fn with_case_conversion(case_conversion: CaseConversion) -> Self {
        Self {
            planner: PlannerSection {
                case_conversion,
                ..Default::default()
            },
        }
    }

    /// Load configuration from a workspace directory
    ///
    /// Looks for `.ingest-mode.toml` in the workspace directory.
    /// Falls back to defaults if not found.
    #[cfg(feature = "config")]
    pub fn load(workspace_path: &Path) -> ConfigResult<Self> {
        let config_path = workspace_path.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(format!("Failed to read config: {}", e)))?;

            Self::parse(&content)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(feature = "config")]
    pub fn parse(content: &str) -> ConfigResult<Self> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a workspace directory
    #[cfg(feature = "config")]
    pub fn save(&self, workspace_path: &Path) -> ConfigResult<()> {
        let config_path = workspace_path.join(CONFIG_FILENAME);
        let content = self.to_toml()?;

        std::fs::write(&config_path, content)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Convert configuration to TOML string
    #[cfg(feature = "config")]
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize config: {}", e))
        })
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var(ENV_CASE_CONVERSION)
            && let Ok(case_conversion) = value.parse()
        {
            self.planner.case_conversion = case_conversion;
        }

        if let Ok(value) = std::env::var(ENV_OPTIMIZATION_COLUMNS)
            && let Ok(enabled) = value.parse()
        {
            self.planner.optimization_columns = enabled;
        }
    }

    /// Check if configuration exists in a workspace
    #[cfg(feature = "config")]
    pub fn exists(workspace_path: &Path) -> bool {
        workspace_path.join(CONFIG_FILENAME).exists()
    }
}

/// Generate a sample configuration file content
#[cfg(feature = "config")]
pub fn sample_config() -> &'static str {
    r#"# Ingest Mode SDK Configuration
# This file configures how ingest plans are derived.

[planner]
# Naming convention for every column and dataset name: "none" (default), "to_upper" or "to_lower"
case_conversion = "none"

# Derive the main schema from staging when the main dataset declares no fields
derive_main_schema = true

# Derive key-range optimization filters for unitemporal delta loads
optimization_columns = true

# Add the temp datasets needed by bitemporal delta loads
temp_datasets = true
"#
}

#[cfg(all(test, feature = "config"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::new();
        assert_eq!(config.planner.case_conversion, CaseConversion::None);
        assert!(config.planner.derive_main_schema);
        assert!(config.planner.optimization_columns);
        assert!(config.planner.temp_datasets);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[planner]
case_conversion = "to_upper"
temp_datasets = false
"#;
        let config = PlannerConfig::parse(toml).unwrap();
        assert_eq!(config.planner.case_conversion, CaseConversion::ToUpper);
        assert!(config.planner.derive_main_schema);
        assert!(!config.planner.temp_datasets);
    }

    #[test]
    fn test_parse_rejects_unknown_case_conversion() {
        let toml = r#"
[planner]
case_conversion = "title"
"#;
        assert!(matches!(
            PlannerConfig::parse(toml),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_sample_config_parses_to_defaults() {
        let config = PlannerConfig::parse(sample_config()).unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let config = PlannerConfig::with_case_conversion(CaseConversion::ToLower);

        assert!(!PlannerConfig::exists(dir.path()));
        config.save(dir.path()).unwrap();
        assert!(PlannerConfig::exists(dir.path()));

        let content = std::fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap();
        let loaded = PlannerConfig::parse(&content).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = PlannerConfig::load(dir.path()).unwrap();
        assert!(config.planner.optimization_columns);
    }
}

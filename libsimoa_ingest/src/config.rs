use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::export_file::DEFAULT_HEADER_ROWS;

/// Structure representing the application configuration. Contains the export
/// path, ingestion parameters and the optional experiment-design template paths.
/// Configs are serializable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub export_path: PathBuf,
    pub header_rows: usize,
    pub skip_malformed_locations: bool,
    pub dilution_template_path: Option<PathBuf>,
    pub feeder_template_path: Option<PathBuf>,
    pub replicate_template_path: Option<PathBuf>,
}

impl Default for Config {
    /// Generate a new Config object. The export path will be empty/invalid
    fn default() -> Self {
        Self {
            export_path: PathBuf::from("None"),
            header_rows: DEFAULT_HEADER_ROWS,
            skip_malformed_locations: false,
            dilution_template_path: None,
            feeder_template_path: None,
            replicate_template_path: None,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// A design is applied only when all three templates are configured
    pub fn has_design_templates(&self) -> bool {
        self.dilution_template_path.is_some()
            && self.feeder_template_path.is_some()
            && self.replicate_template_path.is_some()
    }

    pub fn has_any_design_template(&self) -> bool {
        self.dilution_template_path.is_some()
            || self.feeder_template_path.is_some()
            || self.replicate_template_path.is_some()
    }
}

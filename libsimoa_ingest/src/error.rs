use std::path::PathBuf;
use thiserror::Error;

use super::template::Axis;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location {0:?} does not match \"Plate <N> - Well <L><NN>\"")]
    BadPattern(String),
    #[error("Location has non-numeric plate number {0:?}")]
    BadPlateNumber(String),
    #[error("Location plate number must be positive, got {0}")]
    PlateOutOfRange(u32),
    #[error("Location row letter {0:?} is outside A-H")]
    BadRowLetter(char),
    #[error("Location well token {0:?} has no 1-2 digit column number")]
    BadColumnNumber(String),
    #[error("Location column {0} is outside 1-12")]
    ColumnOutOfRange(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("Sample record has {0} fields; expected one per required column")]
    ShortRecord(usize),
    #[error("Failed to parse sample well location: {0}")]
    Location(#[from] LocationError),
}

#[derive(Debug, Error)]
pub enum ExportFileError {
    #[error("Export file failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Export file failed to parse as delimited text: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Export file ended before the header row; expected {0} preamble rows")]
    MissingHeader(usize),
    #[error("Export file is missing required column {0:?}")]
    MissingColumn(String),
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Could not load template as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Template failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Template failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Template key {0:?} is not valid for a {1}-keyed template")]
    BadKey(String, Axis),
    #[error("Template value for key {0:?} must be a scalar")]
    BadValue(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to export file error: {0}")]
    ExportError(#[from] ExportFileError),
    #[error("Processor failed due to sample row error: {0}")]
    RowError(#[from] RowError),
    #[error("Processor failed due to template error: {0}")]
    TemplateError(#[from] TemplateError),
    #[error("Processor failed due to configuration error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

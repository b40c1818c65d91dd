use std::io;
use thiserror::Error;

use super::table::TableError;
use crate::components::TrimError;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid control input: {0}")]
    InvalidControl(String),

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Property {0} is read-only")]
    ReadOnlyProperty(String),

    #[error("Invalid initial condition: {0}")]
    InvalidInitialCondition(String),

    #[error("Numerical integrity violation in {stage}: {detail}")]
    Integrity { stage: &'static str, detail: String },

    #[error("Trim failed: {0}")]
    Trim(#[from] TrimError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid table: {0}")]
    TableError(#[from] TableError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::ValidationError(message.into())
    }
}

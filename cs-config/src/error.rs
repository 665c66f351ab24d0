// Error types for configuration loading

use cs_validation::ErrorMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Landing '{landing}' has malformed programs JSON: {source}")]
    InvalidPrograms {
        landing: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(ErrorMap),

    #[error("Parameter store error: {0}")]
    ParameterStore(String),

    #[error("No configuration source: set CS_CONFIG_FILE or CS_PARAMETER_PATH")]
    NoSource,

    #[error("Parameter store support is not enabled (build with the `ssm` feature)")]
    SsmDisabled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

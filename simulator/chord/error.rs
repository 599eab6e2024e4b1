//! Errors surfaced by the simulator layer

use chord_sim::{ConfigurationError, Identifier};

#[derive(thiserror::Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("invalid simulation parameter: {0}")]
    InvalidParameter(String),

    #[error("no finger-table path from {from} to {to}")]
    Unreachable { from: Identifier, to: Identifier },

    #[error("malformed experiment log: {0}")]
    MalformedLog(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON log error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scenario parse error: {0}")]
    Scenario(#[from] serde_yaml::Error),
}

use pseudofam::core::models::pseudo::PseudoError;
use pseudofam::engine::config::ConfigError;
use pseudofam::engine::error::FamilyError;
use pseudofam::engine::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Family(#[from] FamilyError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Pseudo(#[from] PseudoError),

    #[error(transparent)]
    FamilyConfig(#[from] ConfigError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

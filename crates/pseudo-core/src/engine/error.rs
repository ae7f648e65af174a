use super::config::ConfigError;
use super::store::StoreError;
use crate::core::models::pseudo::{PseudoError, PseudoType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FamilyError {
    #[error(transparent)]
    Pseudo(#[from] PseudoError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("the PseudoPotentialFamily `{label}` is not stored; nodes can only be added to a stored family")]
    ModificationNotAllowed { label: String },

    #[error("At least one of the provided nodes is unstored, stopping...")]
    UnstoredNodes,

    #[error("only nodes of type `{expected}` can be added")]
    IncorrectType { expected: PseudoType },

    #[error("element `{element}` already present in this family")]
    DuplicateElement { element: String },

    #[error("family `{label}` does not contain pseudo for element `{element}`")]
    ElementNotFound { label: String, element: String },

    #[error("the PseudoPotentialFamily `{label}` already exists")]
    LabelExists { label: String },

    #[error("no PseudoPotentialFamily with label `{label}` exists")]
    FamilyNotFound { label: String },

    #[error("dirpath `{dirpath}` is not a directory")]
    NotADirectory { dirpath: String },

    #[error("dirpath `{dirpath}` contains at least one entry that is not a file: `{entry}`")]
    NotAFile { dirpath: String, entry: String },

    #[error("directory `{dirpath}` contains pseudo potentials with duplicate elements: `{element}`")]
    DuplicateElementsInFolder { dirpath: String, element: String },

    #[error("no pseudo potentials were parsed from `{dirpath}`")]
    NoPseudos { dirpath: String },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

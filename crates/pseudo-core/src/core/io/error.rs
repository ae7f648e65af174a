use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParsingError {
    #[error(
        "`{pseudo_type}` constructor did not define the element and could not parse a valid element symbol from the filename `{filename}`"
    )]
    ElementNotDetermined {
        pseudo_type: &'static str,
        filename: String,
    },

    #[error("could not parse a valid Z valence from `{source_name}`")]
    ZValenceNotFound { source_name: String },

    #[error("Z valence `{value}` in `{source_name}` is not a valid number")]
    InvalidZValence { source_name: String, value: String },

    #[error("could not parse the exchange-correlation type from `{source_name}`")]
    XcTypeNotFound { source_name: String },

    #[error("exchange-correlation type `{value}` in `{source_name}` is not supported")]
    UnknownXcType { source_name: String, value: String },
}

impl ParsingError {
    /// Replaces the placeholder source name used by the content-only parsers.
    pub(crate) fn with_source_name(self, name: &str) -> Self {
        let name = name.to_string();
        match self {
            Self::ZValenceNotFound { .. } => Self::ZValenceNotFound { source_name: name },
            Self::InvalidZValence { value, .. } => Self::InvalidZValence {
                source_name: name,
                value,
            },
            Self::XcTypeNotFound { .. } => Self::XcTypeNotFound { source_name: name },
            Self::UnknownXcType { value, .. } => Self::UnknownXcType {
                source_name: name,
                value,
            },
            other @ Self::ElementNotDetermined { .. } => other,
        }
    }
}

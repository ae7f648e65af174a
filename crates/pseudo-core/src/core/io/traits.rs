use super::error::ParsingError;
use super::vps::XcType;

/// Header values extracted from the content of a pseudopotential file.
///
/// Formats only fill in what they define; the generic record type leaves every
/// field empty.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PseudoHeader {
    /// Number of valence electrons.
    pub z_valence: Option<f64>,
    /// Exchange-correlation functional family.
    pub xc_type: Option<XcType>,
}

/// Defines the interface for reading the header of a pseudopotential format.
///
/// Implementors only need to parse text; the provided methods take care of
/// decoding raw file content and of naming the source in error messages.
pub trait PseudoFormat {
    /// Parses the header values from the full text content of a file.
    ///
    /// # Errors
    ///
    /// Returns a [`ParsingError`] if a value required by the format is missing
    /// or malformed.
    fn parse_header(content: &str) -> Result<PseudoHeader, ParsingError>;

    /// Parses the header values from raw file content.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected, since the
    /// headers themselves are plain ASCII.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw bytes of the file.
    /// * `source_name` - Name reported in error messages, usually the filename.
    ///
    /// # Errors
    ///
    /// Returns a [`ParsingError`] naming `source_name` if parsing fails.
    fn parse_bytes(content: &[u8], source_name: &str) -> Result<PseudoHeader, ParsingError> {
        let text = String::from_utf8_lossy(content);
        Self::parse_header(&text).map_err(|e| e.with_source_name(source_name))
    }
}

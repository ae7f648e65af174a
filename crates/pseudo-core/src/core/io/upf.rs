//! Reader for the Unified Pseudopotential Format (UPF).
//!
//! Two generations of the format are in circulation. UPF v2 is XML-like and
//! stores the valence as the `z_valence` attribute of `PP_HEADER`. UPF v1 uses
//! a fixed-layout text header where each value is followed by a description,
//! for example `    8.00000000000      Z valence`.

use super::error::ParsingError;
use super::patterns::{self, CONTENT_SOURCE, NUMBER};
use super::traits::{PseudoFormat, PseudoHeader};
use once_cell::sync::Lazy;
use regex::Regex;

static Z_VALENCE_ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"z_valence\s*=\s*["'](?P<z_valence>[^"']*)["']"#)
        .expect("valid z_valence attribute regex")
});

static Z_VALENCE_LEGACY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?:^|\s)(?P<z_valence>{NUMBER})\s+Z valence"))
        .expect("valid legacy z_valence regex")
});

/// Patterns in priority order; the first one that matches anywhere wins.
static Z_VALENCE_PATTERNS: [&Lazy<Regex>; 2] = [&Z_VALENCE_ATTRIBUTE_RE, &Z_VALENCE_LEGACY_RE];

/// Parses the number of valence electrons from UPF content.
///
/// # Errors
///
/// Returns [`ParsingError::ZValenceNotFound`] if no known encoding is present
/// and [`ParsingError::InvalidZValence`] if the matched value is not a number.
pub fn parse_z_valence(content: &str) -> Result<f64, ParsingError> {
    for pattern in Z_VALENCE_PATTERNS {
        if let Some(captures) = pattern.captures(content) {
            return patterns::parse_number(&captures["z_valence"]);
        }
    }

    Err(ParsingError::ZValenceNotFound {
        source_name: CONTENT_SOURCE.to_string(),
    })
}

pub struct UpfFile;

impl PseudoFormat for UpfFile {
    fn parse_header(content: &str) -> Result<PseudoHeader, ParsingError> {
        Ok(PseudoHeader {
            z_valence: Some(parse_z_valence(content)?),
            xc_type: None,
        })
    }
}

//! Reader for the OpenMX VPS pseudopotential format.
//!
//! VPS files start with a keyword/value input block echoing the generation
//! parameters, e.g. `valence.electron  8.0` and `xc.type  GGA`. Keywords are
//! matched case-insensitively, as OpenMX itself does.

use super::error::ParsingError;
use super::patterns::{self, CONTENT_SOURCE, NUMBER};
use super::traits::{PseudoFormat, PseudoHeader};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static Z_VALENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?im)^\s*valence\.electron\s+(?P<z_valence>{NUMBER})"
    ))
    .expect("valid valence.electron regex")
});

static XC_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*xc\.type\s+(?P<xc_type>\w+)").expect("valid xc.type regex")
});

/// Exchange-correlation functional family a VPS file was generated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum XcType {
    /// Local density approximation.
    Lda,
    /// Generalized gradient approximation.
    Gga,
}

impl FromStr for XcType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LDA" => Ok(Self::Lda),
            "GGA" => Ok(Self::Gga),
            _ => Err(()),
        }
    }
}

impl fmt::Display for XcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lda => write!(f, "LDA"),
            Self::Gga => write!(f, "GGA"),
        }
    }
}

/// Parses the number of valence electrons from VPS content.
pub fn parse_z_valence(content: &str) -> Result<f64, ParsingError> {
    let captures = Z_VALENCE_RE
        .captures(content)
        .ok_or_else(|| ParsingError::ZValenceNotFound {
            source_name: CONTENT_SOURCE.to_string(),
        })?;
    patterns::parse_number(&captures["z_valence"])
}

/// Parses the exchange-correlation type from VPS content.
pub fn parse_xc_type(content: &str) -> Result<XcType, ParsingError> {
    let captures = XC_TYPE_RE
        .captures(content)
        .ok_or_else(|| ParsingError::XcTypeNotFound {
            source_name: CONTENT_SOURCE.to_string(),
        })?;
    let raw = &captures["xc_type"];
    raw.parse().map_err(|_| ParsingError::UnknownXcType {
        source_name: CONTENT_SOURCE.to_string(),
        value: raw.to_string(),
    })
}

pub struct VpsFile;

impl PseudoFormat for VpsFile {
    fn parse_header(content: &str) -> Result<PseudoHeader, ParsingError> {
        Ok(PseudoHeader {
            z_valence: Some(parse_z_valence(content)?),
            xc_type: Some(parse_xc_type(content)?),
        })
    }
}

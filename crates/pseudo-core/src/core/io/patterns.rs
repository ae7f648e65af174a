use super::error::ParsingError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder source name used until a caller supplies the real filename.
pub(crate) const CONTENT_SOURCE: &str = "content";

/// A decimal literal: integer, decimal, trailing-dot or exponential form.
pub(crate) const NUMBER: &str = r"[-+]?(?:\d*\.\d+|\d+\.?\d*)(?:[Ee][-+]?\d+)?";

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{NUMBER}$")).expect("valid number regex"));

/// Parses a captured numeric field, surrounding whitespace allowed.
pub(crate) fn parse_number(raw: &str) -> Result<f64, ParsingError> {
    let trimmed = raw.trim();
    let invalid = || ParsingError::InvalidZValence {
        source_name: CONTENT_SOURCE.to_string(),
        value: trimmed.to_string(),
    };

    if !NUMBER_RE.is_match(trimmed) {
        return Err(invalid());
    }
    trimmed.parse::<f64>().map_err(|_| invalid())
}

//! Export format and scale validation
//!
//! Normalizes the raw values of a download request. The format check is a
//! whole-batch precondition; the scale never fails and falls back to
//! [`Scale::DEFAULT`].

use crate::domain::{ExportFormat, ExportOptions, Scale, ValidationError};

/// Validate a raw scale/format pair
///
/// * `format` is upper-cased and must be `PNG` or `JPG`; an absent format
///   selects PNG.
/// * `scale` is read as a leading decimal integer and clamped to `1..=4`.
///   Missing, non-numeric and zero values select the default of 3.
///
/// # Examples
///
/// ```
/// use layer_export::core::export::validate;
/// use layer_export::domain::ExportFormat;
///
/// let options = validate(Some("9"), Some("jpg")).unwrap();
/// assert_eq!(options.scale.get(), 4);
/// assert_eq!(options.format, ExportFormat::Jpg);
///
/// assert!(validate(Some("2"), Some("webp")).is_err());
/// ```
pub fn validate(
    raw_scale: Option<&str>,
    raw_format: Option<&str>,
) -> Result<ExportOptions, ValidationError> {
    let format = match raw_format {
        None => ExportFormat::Png,
        Some(raw) => ExportFormat::from_upper(&raw.to_uppercase())
            .ok_or_else(|| ValidationError::UnsupportedFormat(raw.to_string()))?,
    };

    let scale = raw_scale
        .and_then(parse_leading_int)
        .filter(|value| *value != 0)
        .map(Scale::clamped)
        .unwrap_or(Scale::DEFAULT);

    Ok(ExportOptions { format, scale })
}

/// Parse the leading decimal integer of `input`, ignoring leading whitespace
/// and any trailing garbage (`" 2.5x"` reads as 2).
fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    };

    if digits.is_empty() {
        return None;
    }

    // Out-of-range magnitudes saturate; they clamp to the same bound anyway.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

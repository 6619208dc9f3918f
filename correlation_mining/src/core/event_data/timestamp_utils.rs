//! Timestamp parsing and conversion to numeric seconds

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Naive formats (assumed to be UTC), tried in order after the zoned formats
const NAIVE_FORMATS: [&str; 4] = ["%F %T%.f", "%FT%T%.f", "%FT%T", "%F %T UTC"];

/// Parse a timestamp string to `DateTime<FixedOffset>`, trying multiple formats.
///
/// # Supported Formats (in order of precedence)
/// 1. Custom format (if provided), both with timezone and as naive (assumes UTC)
/// 2. RFC3339: `2023-10-06T09:30:21+00:00`
/// 3. ISO 8601 with offset (no colon): `2023-10-06T09:30:21+0000`
/// 4. RFC2822: `Fri, 06 Oct 2023 09:30:21 +0000`
/// 5. Naive datetime with fractional seconds: `2023-10-06 09:30:21.890421` (assumes UTC)
/// 6. Naive ISO 8601 with fractional: `2023-10-06T09:30:21.348555` (assumes UTC)
/// 7. Naive ISO 8601: `2023-10-06T09:30:21` (assumes UTC)
/// 8. Naive with UTC suffix: `2023-10-06 09:30:21 UTC`
///
/// Returns `None` if no format matches.
pub fn parse_timestamp(time: &str, custom_format: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let time = time.trim();
    if let Some(date_format) = custom_format {
        if let Ok(dt) = DateTime::parse_from_str(time, date_format) {
            return Some(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(time, date_format) {
            return Some(dt.and_utc().into());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(time) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(time) {
        return Some(dt);
    }

    let parsed = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(time, format).ok())
        .map(|dt| dt.and_utc().into());
    if parsed.is_none() {
        tracing::trace!(value = time, "no timestamp format matched");
    }
    parsed
}

/// Convert a timestamp to (fractional) seconds since the unix epoch
pub fn to_epoch_seconds(dt: &DateTime<FixedOffset>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1e9
}

/// Parse a timestamp cell of tabular data into seconds since the unix epoch
///
/// Plain numbers (e.g., `1700000000` or `12.5`) are taken as seconds directly;
/// everything else goes through [`parse_timestamp`].
pub fn parse_epoch_seconds(value: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() => Some(seconds),
        Ok(_) => None,
        Err(_) => parse_timestamp(value, None).map(|dt| to_epoch_seconds(&dt)),
    }
}

use jiff::Span;
use jiff::civil::DateTime;
use regex_lite::Regex;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

static TIMESTAMP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}-\d{2}-\d{2}_").expect("timestamp prefix pattern is valid")
});

const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

#[derive(Debug, Error)]
pub enum NamingError {
    #[error("adjusting {timestamp} by {hours} hours leaves the supported date range")]
    OffsetOutOfRange {
        timestamp: DateTime,
        hours: i64,
        #[source]
        source: jiff::Error,
    },
}

/// Removes one leading `YYYY-MM-DDTHH-MM-SS_` prefix, if present.
pub fn strip_timestamp_prefix(name: &str) -> &str {
    match TIMESTAMP_PREFIX.find(name) {
        Some(found) => &name[found.end()..],
        None => name,
    }
}

/// Replaces every character that is illegal in common filesystems with `-`.
pub fn sanitize_filename(name: &str) -> String {
    name.replace(ILLEGAL_CHARS, "-")
}

/// Splits a file name into stem and extension (dot included).
///
/// Leading dots belong to the stem, so `.profile` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(dot) => name.split_at(leading_dots + dot),
        None => (name, ""),
    }
}

pub fn format_timestamp(timestamp: DateTime) -> String {
    timestamp.strftime("%Y-%m-%dT%H-%M-%S").to_string()
}

pub fn adjust_timestamp(timestamp: DateTime, hours: i64) -> Result<DateTime, NamingError> {
    Span::new()
        .try_hours(hours)
        .and_then(|span| timestamp.checked_add(span))
        .map_err(|source| NamingError::OffsetOutOfRange {
            timestamp,
            hours,
            source,
        })
}

/// Builds `<timestamp>_<name>` for `original`, shifted by `hours`.
///
/// An existing timestamp prefix on the original is dropped first so repeated
/// runs never stack prefixes.
pub fn derive_filename(
    original: &Path,
    timestamp: DateTime,
    hours: i64,
) -> Result<String, NamingError> {
    let adjusted = adjust_timestamp(timestamp, hours)?;
    let file_name = original
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, extension) = split_extension(&file_name);
    let stem = strip_timestamp_prefix(stem);

    let name = format!("{}_{}{}", format_timestamp(adjusted), stem, extension);
    Ok(sanitize_filename(&name))
}

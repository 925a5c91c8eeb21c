use crate::scan::{MediaKind, classify_file};
use jiff::civil::DateTime;
use nom_exif::{
    EntryValue, ExifIter, ExifTag, MediaParser, MediaSource, TrackInfo, TrackInfoTag,
};
use std::path::Path;
use thiserror::Error;

const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const IMAGE_TEXT_FORMAT: &str = "%Y:%m:%d %H:%M:%S";
const VIDEO_TEXT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error(transparent)]
    Parse(#[from] nom_exif::Error),
    #[error("unable to extract metadata from the video file")]
    NoTrack,
    #[error("media creation date not found in the metadata")]
    MissingCreationDate,
    #[error("time data {value:?} does not match format {format:?}")]
    BadDate {
        value: String,
        format: &'static str,
        #[source]
        source: jiff::Error,
    },
}

/// Anything that can tell when a media file was captured.
pub trait TimestampSource {
    /// Returns the capture time, or `None` when it cannot be determined.
    /// Failures are reported here and never reach the caller.
    fn creation_timestamp(&mut self, path: &Path) -> Option<DateTime>;
}

/// Reads `DateTimeOriginal` from images and `CreateDate` from video
/// containers.
pub struct MetadataExtractor {
    parser: MediaParser,
    quiet: bool,
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self {
            parser: MediaParser::new(),
            quiet: false,
        }
    }

    /// Keeps `Error:` lines off stdout. Failures still reach the debug log.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn extract(&mut self, path: &Path) -> Result<Option<DateTime>, MetadataError> {
        match classify_file(path) {
            MediaKind::Image => self.image_date(path),
            MediaKind::Video => self.video_date(path).map(Some),
        }
    }

    fn image_date(&mut self, path: &Path) -> Result<Option<DateTime>, MetadataError> {
        let ms = MediaSource::file_path(path)?;
        if !ms.has_exif() {
            return Ok(None);
        }
        let iter: ExifIter = match self.parser.parse(ms) {
            Ok(iter) => iter,
            Err(err) if is_missing_exif(&err) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        for entry in iter {
            if entry.tag() != Some(ExifTag::DateTimeOriginal) {
                continue;
            }
            if let Some(value) = entry.get_value() {
                return entry_value_to_date(value, IMAGE_TEXT_FORMAT);
            }
        }
        Ok(None)
    }

    fn video_date(&mut self, path: &Path) -> Result<DateTime, MetadataError> {
        let ms = MediaSource::file_path(path)?;
        if !ms.has_track() {
            return Err(MetadataError::NoTrack);
        }
        let info: TrackInfo = self.parser.parse(ms)?;
        let value = info
            .get(TrackInfoTag::CreateDate)
            .ok_or(MetadataError::MissingCreationDate)?;
        entry_value_to_date(value, VIDEO_TEXT_FORMAT)?.ok_or(MetadataError::MissingCreationDate)
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampSource for MetadataExtractor {
    fn creation_timestamp(&mut self, path: &Path) -> Option<DateTime> {
        match self.extract(path) {
            Ok(timestamp) => timestamp,
            Err(err) => {
                log::debug!("metadata read failed for {}: {:?}", path.display(), err);
                if !self.quiet {
                    println!("Error: {}", err);
                }
                None
            }
        }
    }
}

// nom-exif reports an image without any Exif block as a parse failure.
fn is_missing_exif(err: &nom_exif::Error) -> bool {
    matches!(err, nom_exif::Error::ParseFailed(inner) if inner.to_string() == "Exif not found")
}

// Structured values keep their own wall-clock time; text goes through the
// strategy's fixed format.
fn entry_value_to_date(
    entry: &EntryValue,
    text_format: &'static str,
) -> Result<Option<DateTime>, MetadataError> {
    let (text, format) = match entry {
        EntryValue::Time(dt) => (dt.format(CANONICAL_FORMAT).to_string(), CANONICAL_FORMAT),
        EntryValue::NaiveDateTime(dt) => {
            (dt.format(CANONICAL_FORMAT).to_string(), CANONICAL_FORMAT)
        }
        EntryValue::Text(s) => (s.trim_end_matches('\0').trim().to_string(), text_format),
        _ => return Ok(None),
    };
    parse_date_string(&text, format).map(Some)
}

fn parse_date_string(value: &str, format: &'static str) -> Result<DateTime, MetadataError> {
    DateTime::strptime(format, value).map_err(|source| MetadataError::BadDate {
        value: value.to_string(),
        format,
        source,
    })
}

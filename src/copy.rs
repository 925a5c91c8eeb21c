use crate::dedup::DirectoryIndex;
use crate::metadata::TimestampSource;
use crate::naming::{self, NamingError};
use filetime::FileTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    SimulatedCopy,
    SkippedDuplicate,
    SkippedNoDate,
    Failed,
}

#[derive(Debug, Error)]
pub enum CopyError {
    #[error(transparent)]
    Naming(#[from] NamingError),
    #[error("{} and its target are the same file", .0.display())]
    SameFile(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    /// Where renamed copies go; `None` means next to each source file.
    pub destination: Option<PathBuf>,
    pub hour_offset: i64,
    pub simulate: bool,
    pub force: bool,
    pub quiet: bool,
}

/// Decides and performs the copy for one file at a time.
pub struct Organiser<S> {
    source: S,
    options: CopyOptions,
    index: DirectoryIndex,
}

impl<S: TimestampSource> Organiser<S> {
    pub fn new(source: S, options: CopyOptions) -> Self {
        Self {
            source,
            options,
            index: DirectoryIndex::new(),
        }
    }

    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    pub fn process(&mut self, path: &Path) -> CopyOutcome {
        let Some(timestamp) = self.source.creation_timestamp(path) else {
            self.report(format_args!(
                "{} - File does not contain the creation date in metadata",
                path.display()
            ));
            return CopyOutcome::SkippedNoDate;
        };

        let target_dir = self.target_dir(path);
        let filename = match naming::derive_filename(path, timestamp, self.options.hour_offset) {
            Ok(name) => name,
            Err(e) => {
                self.report(format_args!("{} - {}", path.display(), e));
                return CopyOutcome::Failed;
            }
        };
        let target = target_dir.join(&filename);

        if !self.options.force
            && (target.exists() || self.index.contains_equivalent(&target_dir, &filename))
        {
            self.report(format_args!(
                "{} -> {} - Skipped, already copied",
                path.display(),
                target.display()
            ));
            return CopyOutcome::SkippedDuplicate;
        }

        if self.options.simulate {
            self.report(format_args!(
                "{} -> {} - Simulated Copy",
                path.display(),
                target.display()
            ));
            return CopyOutcome::SimulatedCopy;
        }

        match copy_preserving_times(path, &target) {
            Ok(()) => {
                self.index.record(&target_dir, &filename);
                self.report(format_args!("{} -> {} - Copied", path.display(), target.display()));
                CopyOutcome::Copied
            }
            Err(e) => {
                log::warn!("copy of {} failed: {:?}", path.display(), e);
                self.report(format_args!(
                    "{} -> {} - Copy failed: {}",
                    path.display(),
                    target.display(),
                    e
                ));
                CopyOutcome::Failed
            }
        }
    }

    fn target_dir(&self, path: &Path) -> PathBuf {
        match &self.options.destination {
            Some(dir) => dir.clone(),
            None => match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        }
    }

    fn report(&self, line: std::fmt::Arguments<'_>) {
        if !self.options.quiet {
            println!("{}", line);
        }
    }
}

/// Copies `source` to `dest`, creating parent directories, then carries the
/// access and modification times across. Permissions travel with the copy.
pub fn copy_preserving_times(source: &Path, dest: &Path) -> Result<(), CopyError> {
    if is_same_file(source, dest) {
        return Err(CopyError::SameFile(source.to_path_buf()));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, dest)?;

    let meta = fs::metadata(source)?;
    filetime::set_file_times(
        dest,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )?;
    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

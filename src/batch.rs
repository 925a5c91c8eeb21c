use crate::copy::{CopyOutcome, Organiser};
use crate::metadata::TimestampSource;
use crate::scan::{self, ScanError};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;

/// Running tally of one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub requested: usize,
    pub processed: usize,
    pub no_date: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(self, outcome: CopyOutcome) -> Self {
        let mut next = Self {
            requested: self.requested + 1,
            ..self
        };
        match outcome {
            CopyOutcome::Copied | CopyOutcome::SimulatedCopy => next.processed += 1,
            CopyOutcome::SkippedNoDate => next.no_date += 1,
            CopyOutcome::Failed => next.failed += 1,
            CopyOutcome::SkippedDuplicate => {}
        }
        next
    }

    pub fn already_copied(&self) -> usize {
        self.requested - self.processed - self.no_date - self.failed
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Input Media: {}, Processed: {}, Already Copied: {}, No Creation Date: {}",
            self.requested,
            self.processed,
            self.already_copied(),
            self.no_date
        )?;
        if self.failed > 0 {
            write!(f, ", Failed: {}", self.failed)?;
        }
        Ok(())
    }
}

/// Expands `pattern` and runs every match through `organiser` in order.
///
/// Returns `None` when nothing matched; the caller prints the summary
/// otherwise.
pub fn run<S: TimestampSource>(
    pattern: &str,
    organiser: &mut Organiser<S>,
) -> Result<Option<Summary>, ScanError> {
    let files = scan::expand_pattern(pattern)?;
    if files.is_empty() {
        println!("No matching media files found.");
        return Ok(None);
    }
    log::info!("{} files match {:?}", files.len(), pattern);

    let progress = progress_bar(files.len(), organiser.options().quiet);
    let summary = files.iter().fold(Summary::default(), |summary, path| {
        let outcome = organiser.process(path);
        progress.inc(1);
        summary.record(outcome)
    });
    progress.finish_and_clear();

    Ok(Some(summary))
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress
}

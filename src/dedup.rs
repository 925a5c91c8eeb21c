use crate::naming::strip_timestamp_prefix;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn stripped_entries(dir: &Path) -> HashSet<String> {
    if !dir.exists() {
        return HashSet::new();
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| strip_timestamp_prefix(&e.file_name().to_string_lossy()).to_string())
        .collect()
}

/// Per-run cache of prefix-stripped directory listings.
///
/// Each directory is listed on first use; names copied in afterwards are
/// recorded so lookups stay equal to a fresh listing.
#[derive(Debug, Default)]
pub struct DirectoryIndex {
    dirs: HashMap<PathBuf, HashSet<String>>,
}

impl DirectoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `dir` already holds an entry whose name equals `candidate`
    /// once any timestamp prefix is removed from both.
    pub fn contains_equivalent(&mut self, dir: &Path, candidate: &str) -> bool {
        self.entries(dir).contains(strip_timestamp_prefix(candidate))
    }

    pub fn record(&mut self, dir: &Path, name: &str) {
        let stripped = strip_timestamp_prefix(name).to_string();
        self.entries(dir).insert(stripped);
    }

    fn entries(&mut self, dir: &Path) -> &mut HashSet<String> {
        self.dirs.entry(dir.to_path_buf()).or_insert_with(|| {
            let entries = stripped_entries(dir);
            log::debug!("indexed {} entries in {}", entries.len(), dir.display());
            entries
        })
    }
}

use globset::GlobBuilder;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const GLOB_META: &[char] = &['*', '?', '[', '{'];

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid file pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

pub fn classify_file(path: &Path) -> MediaKind {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if matches!(extension.as_str(), "mp4" | "m4v" | "mov" | "3gp" | "mkv") {
        MediaKind::Video
    } else {
        MediaKind::Image
    }
}

/// Expands a shell-style pattern into the regular files it names.
///
/// Leading components without metacharacters form the walk root; the rest are
/// matched component by component at exactly that depth. Results come back
/// sorted by file name.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, ScanError> {
    let mut base = PathBuf::new();
    let mut rest: Vec<String> = Vec::new();
    for component in Path::new(pattern).components() {
        let text = component.as_os_str().to_string_lossy().into_owned();
        if rest.is_empty() && !text.contains(GLOB_META) {
            base.push(component);
        } else {
            rest.push(text);
        }
    }

    if rest.is_empty() {
        return Ok(if base.is_file() { vec![base] } else { Vec::new() });
    }

    let matcher = GlobBuilder::new(&rest.join("/"))
        .literal_separator(true)
        .build()
        .map_err(|source| ScanError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    let root = if base.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        base.clone()
    };
    log::debug!("expanding {:?} under {}", pattern, root.display());

    let depth = rest.len();
    let files = WalkDir::new(&root)
        .min_depth(depth)
        .max_depth(depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(&root).ok()?.to_path_buf();
            if hides_from(&relative, &rest) || !matcher.is_match(&relative) {
                return None;
            }
            Some(base.join(relative))
        })
        .collect();
    Ok(files)
}

// Dot-files only match pattern components that spell out the dot themselves.
fn hides_from(relative: &Path, pattern: &[String]) -> bool {
    relative
        .components()
        .zip(pattern)
        .any(|(component, pattern)| match component {
            Component::Normal(name) => {
                name.to_string_lossy().starts_with('.') && !pattern.starts_with('.')
            }
            _ => false,
        })
}

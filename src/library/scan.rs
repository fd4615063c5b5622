use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::{EngineError, Result};

use super::model::Entry;

/// Case-sensitive suffix match on the file name, e.g. `song.wav` but not
/// `song.WAV`. Historic reports were produced with this exact filter, so
/// matching stays strict.
fn matches_extension(path: &Path, settings: &LibrarySettings) -> bool {
    let suffix = format!(".{}", settings.extension);
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.ends_with(&suffix))
        .unwrap_or(false)
}

/// Recursively enumerate playable files under `dir`.
///
/// Result order is filesystem-enumeration order, which is not stable
/// across platforms; callers get some permutation of the matching files.
/// All gains start at zero. A missing or unreadable root yields
/// [`EngineError::Scan`]; errors deeper in the walk are logged and the
/// affected entries skipped.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = Vec::new();

    for item in WalkDir::new(dir).follow_links(settings.follow_links) {
        match item {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_file() && matches_extension(path, settings) {
                    entries.push(Entry::new(path.to_path_buf()));
                }
            }
            Err(err) => {
                if err.depth() == 0 {
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("walk aborted"));
                    return Err(EngineError::Scan {
                        path: dir.to_path_buf(),
                        source,
                    });
                }
                warn!("skipping unreadable path under {}: {err}", dir.display());
            }
        }
    }

    debug!(count = entries.len(), "scanned {}", dir.display());
    Ok(entries)
}

//! Playlist state persistence: sorted text report and JSON document.

mod document;
mod report;

pub use document::{StateDocument, read_document, write_document};
pub use report::write_report;

use std::path::Path;

/// Default suggested export file name: the folder's name plus `ext`.
pub fn suggested_file_name(folder: &Path, ext: &str) -> Option<String> {
    folder
        .file_name()
        .and_then(|s| s.to_str())
        .map(|name| format!("{name}.{ext}"))
}

#[cfg(test)]
mod tests;

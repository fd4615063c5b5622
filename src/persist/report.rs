use std::fs;
use std::path::Path;

use crate::error::{EngineError, Result};
use crate::gain;
use crate::library::Entry;

/// Write the plain-text report: one `"<name> - <gain>"` line per entry,
/// gain at one decimal, lines sorted lexicographically by their full
/// text rather than playlist order. Export only; never read back.
pub fn write_report(path: &Path, entries: &[Entry]) -> Result<()> {
    let mut lines: Vec<String> = entries
        .iter()
        .map(|e| format!("{} - {}", e.name, gain::format_gain(e.gain, gain::REPORT_DECIMALS)))
        .collect();
    lines.sort();

    let text = if lines.is_empty() {
        String::new()
    } else {
        lines.join("\n") + "\n"
    };
    fs::write(path, text).map_err(|e| EngineError::Persistence {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

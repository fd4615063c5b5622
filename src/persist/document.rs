use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::gain;
use crate::library::Entry;

/// Parsed state document. Either section may be absent; the reader
/// degrades gracefully instead of rejecting the whole file.
#[derive(Debug, Clone, Default)]
pub struct StateDocument {
    pub folder_path: Option<String>,
    pub files: Vec<(String, f32)>,
}

/// Escape for the document writer: backslash, double quote and forward
/// slash get a leading backslash; nothing else is touched. Existing
/// saved documents use exactly this set, including the unusual `\/`.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c == '"' || c == '\\' || c == '/' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Write the state document in the legacy layout:
///
/// ```json
/// {
///   "folderPath": "...",
///   "files": [
///     {
///       "fileName": "...",
///       "Gain": -2.5
///     }
///   ]
/// }
/// ```
///
/// The per-entry key is `Gain`, capitalized, for compatibility with
/// documents already in the wild; gains carry at most two decimals.
pub fn write_document(path: &Path, folder: &Path, entries: &[Entry]) -> Result<()> {
    let mut doc = String::new();
    doc.push_str("{\n");
    let _ = writeln!(
        doc,
        "  \"folderPath\": \"{}\",",
        escape(&folder.display().to_string())
    );
    doc.push_str("  \"files\": [\n");

    for (i, entry) in entries.iter().enumerate() {
        doc.push_str("    {\n");
        let _ = writeln!(doc, "      \"fileName\": \"{}\",", escape(&entry.name));
        let _ = writeln!(
            doc,
            "      \"Gain\": {}",
            gain::format_gain(entry.gain, gain::DOCUMENT_DECIMALS)
        );
        if i + 1 < entries.len() {
            doc.push_str("    },\n");
        } else {
            doc.push_str("    }\n");
        }
    }

    doc.push_str("  ]\n");
    doc.push('}');

    fs::write(path, doc).map_err(|e| EngineError::Persistence {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

/// Read a state document with a real JSON parser.
///
/// Missing or malformed `folderPath`/`files` sections are skipped, not
/// fatal; a file that is not JSON at all is a persistence failure.
pub fn read_document(path: &Path) -> Result<StateDocument> {
    let text = fs::read_to_string(path).map_err(|e| EngineError::Persistence {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|e| EngineError::Persistence {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let folder_path = value
        .get("folderPath")
        .and_then(Value::as_str)
        .map(str::to_string);

    let files: Vec<(String, f32)> = value
        .get("files")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let name = item.get("fileName")?.as_str()?;
                    let gain = item.get("Gain")?.as_f64()?;
                    Some((name.to_string(), gain as f32))
                })
                .collect()
        })
        .unwrap_or_default();

    debug!(
        files = files.len(),
        has_folder = folder_path.is_some(),
        "read state document {}",
        path.display()
    );
    Ok(StateDocument { folder_path, files })
}

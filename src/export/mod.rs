//! Plain-text export: clipboard copy and atomic file writes.

use std::io::Write;
use std::path::{Path, PathBuf};

use arboard::Clipboard;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Place text on the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), ExportError> {
    let mut clipboard = Clipboard::new().map_err(|e| ExportError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| ExportError::Clipboard(e.to_string()))?;
    debug!(bytes = text.len(), "copied to clipboard");
    Ok(())
}

/// Deterministic export file name: `<label>-<subject>.txt`, whitespace runs
/// in the subject collapsed to hyphens, path separators dropped.
pub fn file_name(label: &str, subject: Option<&str>) -> String {
    match subject.map(slug).filter(|s| !s.is_empty()) {
        Some(slug) => format!("{label}-{slug}.txt"),
        None => format!("{label}.txt"),
    }
}

fn slug(subject: &str) -> String {
    let cleaned: String = subject
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':') && !c.is_control())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Write `text` to `dir/file_name` through a named temp file persisted into
/// place. A failed write cleans up after itself and leaves no partial file.
pub fn save_text(dir: &Path, file_name: &str, text: &str) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name);

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ExportError::Write {
        path: path.clone(),
        source: e,
    })?;
    tmp.write_all(text.as_bytes()).map_err(|e| ExportError::Write {
        path: path.clone(),
        source: e,
    })?;
    tmp.persist(&path).map_err(|e| ExportError::Write {
        path: path.clone(),
        source: e.error,
    })?;

    debug!(path = %path.display(), bytes = text.len(), "letter exported");
    Ok(path)
}

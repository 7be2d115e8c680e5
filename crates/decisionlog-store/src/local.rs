use crate::error::StoreError;
use decisionlog_core::document::Document;
use decisionlog_core::normalize::{normalize_bytes, Normalized};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Import a document from a local file.
///
/// Runs the same parse + repair path as a remote read, so a hand-crafted
/// or legacy file is tolerated exactly like one fetched from the store.
pub fn import_file(path: impl AsRef<Path>) -> Result<Normalized, StoreError> {
    let bytes = fs::read(path.as_ref())?;
    Ok(normalize_bytes(&bytes)?)
}

/// Export a document to a local file in the persisted wire format.
///
/// Serialized to a temp file first, then renamed over the target, so an
/// interrupted export never leaves a partial file.
pub fn export_file(path: impl AsRef<Path>, document: &Document) -> Result<(), StoreError> {
    let path = path.as_ref();
    let bytes = document.to_json_bytes()?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    debug!(path = %path.display(), "exported document");
    Ok(())
}

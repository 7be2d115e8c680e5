use crate::remote::FileId;
use chrono::{DateTime, Utc};
use decisionlog_core::document::Document;

/// The single open document of a session, with its sync bookkeeping.
#[derive(Debug, Clone)]
pub struct OpenDocument {
    pub file_id: FileId,
    pub file_name: String,
    pub document: Document,
    pub last_synced_at: DateTime<Utc>,
}

/// Holds at most one open document at a time.
///
/// A plain value owned by the caller and passed by reference; opening a
/// second document replaces the first (warning the user first is the UI's
/// job). Mutation of the held document happens in place through
/// [`document_mut`](Session::document_mut); validation only happens on open.
#[derive(Debug, Default)]
pub struct Session {
    open: Option<OpenDocument>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document, setting all bookkeeping fields together.
    pub fn open(
        &mut self,
        file_id: FileId,
        file_name: impl Into<String>,
        document: Document,
        observed: DateTime<Utc>,
    ) {
        self.open = Some(OpenDocument {
            file_id,
            file_name: file_name.into(),
            document,
            last_synced_at: observed,
        });
    }

    /// Clear all session state.
    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn current(&self) -> Option<&OpenDocument> {
        self.open.as_ref()
    }

    pub fn document(&self) -> Option<&Document> {
        self.open.as_ref().map(|o| &o.document)
    }

    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.open.as_mut().map(|o| &mut o.document)
    }

    /// Record a completed sync at `timestamp`.
    pub(crate) fn record_sync(&mut self, timestamp: DateTime<Utc>) {
        if let Some(open) = self.open.as_mut() {
            open.last_synced_at = timestamp;
        }
    }
}

use crate::error::StoreError;
use crate::naming;
use crate::remote::{FileId, FileStore, RemoteFile};
use crate::session::Session;
use chrono::Utc;
use decisionlog_core::document::Document;
use decisionlog_core::normalize::{normalize_bytes, Normalized, Repair};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Default per-operation timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// High-level document store client.
///
/// Normalizes on every read, guards every write with the
/// optimistic-concurrency check, and serializes writes per file id so the
/// check-then-upload window cannot race within this process. Errors are
/// surfaced, never retried.
pub struct StoreClient<S> {
    store: S,
    timeout: Duration,
    write_gates: Mutex<HashMap<FileId, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S: FileStore> StoreClient<S> {
    pub fn new(store: S) -> Self {
        Self::with_timeout(store, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(store: S, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            write_gates: Mutex::new(HashMap::new()),
        }
    }

    /// Remote files that follow the document naming convention, newest
    /// first.
    pub async fn list_candidate_files(&self) -> Result<Vec<RemoteFile>, StoreError> {
        let mut files: Vec<RemoteFile> = self
            .with_timeout_on(self.store.list())
            .await?
            .into_iter()
            .filter(|f| naming::is_candidate(&f.name))
            .collect();
        files.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(files)
    }

    /// Write a new remote file for `document`, named after its owner.
    pub async fn create_document(&self, document: &Document) -> Result<RemoteFile, StoreError> {
        let name = naming::new_file_name(&document.meta.username, Utc::now());
        let bytes = document.to_json_bytes()?;
        let file = self.with_timeout_on(self.store.create(&name, &bytes)).await?;
        debug!(id = %file.id, name = %file.name, "created document file");
        Ok(file)
    }

    /// Fetch and normalize a document without touching any session.
    pub async fn load(&self, id: &FileId) -> Result<(Normalized, chrono::DateTime<Utc>), StoreError> {
        let (bytes, modified) = self.with_timeout_on(self.store.download(id)).await?;
        let normalized = normalize_bytes(&bytes)?;
        if !normalized.repairs.is_empty() {
            warn!(
                file = %id,
                count = normalized.repairs.len(),
                "repaired document during load"
            );
            for repair in &normalized.repairs {
                debug!(%repair, "normalizer repair");
            }
        }
        Ok((normalized, modified))
    }

    /// Load `file` into the session, replacing whatever was open.
    ///
    /// Returns the repairs normalization performed (diagnostics only).
    pub async fn open(
        &self,
        file: &RemoteFile,
        session: &mut Session,
    ) -> Result<Vec<Repair>, StoreError> {
        let (Normalized { document, repairs }, modified) = self.load(&file.id).await?;
        session.open(file.id.clone(), &file.name, document, modified);
        Ok(repairs)
    }

    /// Persist the session's document, refusing to overwrite a remote file
    /// that changed since this session last synced it.
    pub async fn save(&self, session: &mut Session) -> Result<(), StoreError> {
        self.save_inner(session, true).await
    }

    /// Persist unconditionally. The explicit force path a caller reaches
    /// for after a conflict.
    pub async fn save_overwriting(&self, session: &mut Session) -> Result<(), StoreError> {
        self.save_inner(session, false).await
    }

    async fn save_inner(
        &self,
        session: &mut Session,
        check_conflict: bool,
    ) -> Result<(), StoreError> {
        let (file_id, last_synced_at) = match session.current() {
            Some(open) => (open.file_id.clone(), open.last_synced_at),
            None => return Err(StoreError::NoOpenDocument),
        };

        // Hold the gate across check and upload: overlapping saves for the
        // same file id queue here instead of racing.
        let gate = self.write_gate(&file_id);
        let _guard = gate.lock().await;

        if check_conflict {
            let remote = self.with_timeout_on(self.store.metadata(&file_id)).await?;
            if remote.modified > last_synced_at {
                return Err(StoreError::Conflict {
                    file_id,
                    remote_modified: remote.modified,
                    last_synced_at,
                });
            }
        }

        let bytes = match session.document_mut() {
            Some(document) => {
                document.touch();
                document.to_json_bytes()?
            }
            None => return Err(StoreError::NoOpenDocument),
        };

        let modified = self.with_timeout_on(self.store.upload(&file_id, &bytes)).await?;
        session.record_sync(modified);
        debug!(file = %file_id, %modified, "saved document");
        Ok(())
    }

    fn write_gate(&self, id: &FileId) -> Arc<tokio::sync::Mutex<()>> {
        let mut gates = match self.write_gates.lock() {
            Ok(gates) => gates,
            Err(poisoned) => poisoned.into_inner(),
        };
        gates.entry(id.clone()).or_default().clone()
    }

    async fn with_timeout_on<T>(
        &self,
        op: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Transport(format!(
                "operation timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

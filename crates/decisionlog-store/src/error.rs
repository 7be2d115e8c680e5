use crate::remote::FileId;
use chrono::{DateTime, Utc};
use decisionlog_core::error::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or service failure, including timeouts. Retryable at the
    /// caller's discretion; never retried here.
    #[error("transport error: {0}")]
    Transport(String),

    /// Missing, invalid or expired bearer credential.
    #[error("auth error: {0}")]
    Auth(String),

    /// Content is not a well-formed document and could not be repaired.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Write rejected: the remote file changed since this session last
    /// synced it. The caller must re-fetch and re-apply, or force-overwrite.
    #[error("conflict: remote file {file_id} modified at {remote_modified} (last synced {last_synced_at})")]
    Conflict {
        file_id: FileId,
        remote_modified: DateTime<Utc>,
        last_synced_at: DateTime<Utc>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no document open in session")]
    NoOpenDocument,
}

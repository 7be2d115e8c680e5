use crate::error::StoreError;
use chrono::{DateTime, Utc};
use std::fmt;

/// Opaque identifier of a file in a [`FileStore`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptor of a remote file as observed at some instant.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFile {
    pub id: FileId,
    pub name: String,
    pub modified: DateTime<Utc>,
}

/// Transport seam over a file-storage backend.
///
/// Implementations move raw bytes and report last-modified timestamps;
/// parsing, normalization and the conflict check live in
/// [`StoreClient`](crate::client::StoreClient).
#[allow(async_fn_in_trait)]
pub trait FileStore {
    /// List all files visible to this store.
    async fn list(&self) -> Result<Vec<RemoteFile>, StoreError>;

    /// Current metadata for one file.
    async fn metadata(&self, id: &FileId) -> Result<RemoteFile, StoreError>;

    /// Write a new file. Fails if `name` already exists.
    async fn create(&self, name: &str, bytes: &[u8]) -> Result<RemoteFile, StoreError>;

    /// Fetch a file's bytes plus its last-modified timestamp as observed
    /// at fetch time.
    async fn download(&self, id: &FileId) -> Result<(Vec<u8>, DateTime<Utc>), StoreError>;

    /// Overwrite an existing file; returns the new last-modified timestamp.
    async fn upload(&self, id: &FileId, bytes: &[u8]) -> Result<DateTime<Utc>, StoreError>;
}

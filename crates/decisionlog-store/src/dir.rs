use crate::error::StoreError;
use crate::remote::{FileId, FileStore, RemoteFile};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A local directory as a file store.
///
/// File names double as ids and filesystem mtime is the last-modified
/// timestamp. Writes go through a temp file + rename, so a reader never
/// observes partial content.
pub struct DirFileStore {
    root: PathBuf,
}

impl DirFileStore {
    /// Open a directory-backed store at `root`, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &FileId) -> Result<PathBuf, StoreError> {
        let name = id.as_str();
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(StoreError::Transport(format!("invalid file id '{name}'")));
        }
        Ok(self.root.join(name))
    }

    fn describe(&self, path: &Path) -> Result<RemoteFile, StoreError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let modified = fs::metadata(path)?.modified()?;
        Ok(RemoteFile {
            id: FileId::new(&name),
            name,
            modified: DateTime::from(modified),
        })
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl FileStore for DirFileStore {
    async fn list(&self) -> Result<Vec<RemoteFile>, StoreError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            files.push(self.describe(&entry.path())?);
        }
        Ok(files)
    }

    async fn metadata(&self, id: &FileId) -> Result<RemoteFile, StoreError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(StoreError::Transport(format!("file '{id}' not found")));
        }
        self.describe(&path)
    }

    async fn create(&self, name: &str, bytes: &[u8]) -> Result<RemoteFile, StoreError> {
        let id = FileId::new(name);
        let path = self.path_for(&id)?;
        if path.exists() {
            return Err(StoreError::Transport(format!(
                "file '{name}' already exists"
            )));
        }
        self.write_atomic(&path, bytes)?;
        debug!(name, "created file");
        self.describe(&path)
    }

    async fn download(&self, id: &FileId) -> Result<(Vec<u8>, DateTime<Utc>), StoreError> {
        let path = self.path_for(id)?;
        let file = self.metadata(id).await?;
        let bytes = fs::read(&path)?;
        Ok((bytes, file.modified))
    }

    async fn upload(&self, id: &FileId, bytes: &[u8]) -> Result<DateTime<Utc>, StoreError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(StoreError::Transport(format!("file '{id}' not found")));
        }
        self.write_atomic(&path, bytes)?;
        debug!(id = %id, "uploaded file");
        Ok(self.describe(&path)?.modified)
    }
}

pub mod create;
pub mod decide;
pub mod export;
pub mod import;
pub mod list;
pub mod remove;
pub mod review;
pub mod show;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use decisionlog_core::document::Document;
use decisionlog_store::auth::EnvToken;
use decisionlog_store::dir::DirFileStore;
use decisionlog_store::dropbox::DropboxFileStore;
use decisionlog_store::error::StoreError;
use decisionlog_store::remote::{FileId, FileStore, RemoteFile};
use decisionlog_store::{Session, StoreClient};
use std::env;
use std::path::PathBuf;

/// Environment variable holding the Dropbox bearer token.
pub const TOKEN_ENV: &str = "DECISIONLOG_DROPBOX_TOKEN";
/// Environment variable selecting the local directory store.
pub const DIR_ENV: &str = "DECISIONLOG_DIR";

/// The file-store backend selected by flags and environment.
pub enum Backend {
    Dir(DirFileStore),
    Dropbox(DropboxFileStore<EnvToken>),
}

impl FileStore for Backend {
    async fn list(&self) -> Result<Vec<RemoteFile>, StoreError> {
        match self {
            Self::Dir(store) => store.list().await,
            Self::Dropbox(store) => store.list().await,
        }
    }

    async fn metadata(&self, id: &FileId) -> Result<RemoteFile, StoreError> {
        match self {
            Self::Dir(store) => store.metadata(id).await,
            Self::Dropbox(store) => store.metadata(id).await,
        }
    }

    async fn create(&self, name: &str, bytes: &[u8]) -> Result<RemoteFile, StoreError> {
        match self {
            Self::Dir(store) => store.create(name, bytes).await,
            Self::Dropbox(store) => store.create(name, bytes).await,
        }
    }

    async fn download(&self, id: &FileId) -> Result<(Vec<u8>, DateTime<Utc>), StoreError> {
        match self {
            Self::Dir(store) => store.download(id).await,
            Self::Dropbox(store) => store.download(id).await,
        }
    }

    async fn upload(&self, id: &FileId, bytes: &[u8]) -> Result<DateTime<Utc>, StoreError> {
        match self {
            Self::Dir(store) => store.upload(id, bytes).await,
            Self::Dropbox(store) => store.upload(id, bytes).await,
        }
    }
}

/// Build the client: `--dropbox` wins, then `--dir`, then `DECISIONLOG_DIR`,
/// then `./decisionlog`.
pub fn backend(dir: Option<PathBuf>, dropbox: bool) -> Result<StoreClient<Backend>> {
    let backend = if dropbox {
        Backend::Dropbox(DropboxFileStore::new(EnvToken::new(TOKEN_ENV)))
    } else {
        let root = dir
            .or_else(|| env::var_os(DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("decisionlog"));
        Backend::Dir(DirFileStore::new(root)?)
    };
    Ok(StoreClient::new(backend))
}

/// Resolve a file argument (name or id) against the candidate list.
pub async fn resolve_file(client: &StoreClient<Backend>, file: &str) -> Result<RemoteFile> {
    let candidates = client.list_candidate_files().await?;
    candidates
        .into_iter()
        .find(|f| f.name == file || f.id.as_str() == file)
        .with_context(|| format!("no document file matching '{file}'"))
}

/// Id of the decision matching `needle` (full id or unique prefix).
pub fn find_decision_id(document: &Document, needle: &str) -> Result<String> {
    let matches: Vec<&str> = document
        .decisions
        .iter()
        .filter(|d| d.id.starts_with(needle))
        .map(|d| d.id.as_str())
        .collect();
    match matches.len() {
        0 => bail!("no decision matching '{needle}'"),
        1 => Ok(matches[0].to_string()),
        n => bail!("decision '{needle}' is ambiguous ({n} matches)"),
    }
}

/// Save the session; a conflict comes back with force guidance attached.
pub async fn save_session(
    client: &StoreClient<Backend>,
    session: &mut Session,
    force: bool,
) -> Result<()> {
    let result = if force {
        client.save_overwriting(session).await
    } else {
        client.save(session).await
    };
    result.map_err(|e| match e {
        StoreError::Conflict { .. } => anyhow::anyhow!("{e}; re-run with --force to overwrite"),
        other => other.into(),
    })
}

/// Short display form of an id.
pub fn short(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

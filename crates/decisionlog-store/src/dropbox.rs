use crate::auth::TokenProvider;
use crate::error::StoreError;
use crate::remote::{FileId, FileStore, RemoteFile};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const API_BASE: &str = "https://api.dropboxapi.com/2";
const CONTENT_BASE: &str = "https://content.dropboxapi.com/2";

/// Dropbox-backed file store.
///
/// Talks to the Dropbox HTTP API v2 inside the app folder the bearer
/// token is scoped to. The token is requested from the provider per call;
/// a missing token fails with an auth error before any network I/O.
pub struct DropboxFileStore<P> {
    http: reqwest::Client,
    tokens: P,
    api_base: String,
    content_base: String,
}

#[derive(Deserialize)]
struct ListFolderResponse {
    entries: Vec<Entry>,
    cursor: String,
    has_more: bool,
}

#[derive(Deserialize)]
struct Entry {
    #[serde(rename = ".tag")]
    tag: String,
    id: String,
    name: String,
    server_modified: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct FileMetadata {
    id: String,
    name: String,
    server_modified: DateTime<Utc>,
}

impl Entry {
    fn into_remote_file(self) -> Option<RemoteFile> {
        if self.tag != "file" {
            return None;
        }
        Some(RemoteFile {
            id: FileId::new(self.id),
            name: self.name,
            modified: self.server_modified?,
        })
    }
}

impl<P: TokenProvider> DropboxFileStore<P> {
    pub fn new(tokens: P) -> Self {
        Self::with_base_urls(tokens, API_BASE, CONTENT_BASE)
    }

    /// Point the store at different hosts. Used by tests and stubs.
    pub fn with_base_urls(
        tokens: P,
        api_base: impl Into<String>,
        content_base: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens,
            api_base: api_base.into(),
            content_base: content_base.into(),
        }
    }

    fn token(&self) -> Result<String, StoreError> {
        self.tokens
            .bearer_token()
            .ok_or_else(|| StoreError::Auth("no bearer token available".into()))
    }

    async fn rpc(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, StoreError> {
        let token = self.token()?;
        let response = self
            .http
            .post(format!("{}/{}", self.api_base, endpoint))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await
    }

    async fn upload_inner(
        &self,
        path: &str,
        mode: &str,
        bytes: Vec<u8>,
    ) -> Result<FileMetadata, StoreError> {
        let token = self.token()?;
        let arg = json!({ "path": path, "mode": mode, "autorename": false }).to_string();
        let response = self
            .http
            .post(format!("{}/files/upload", self.content_base))
            .bearer_auth(token)
            .header("Dropbox-API-Arg", arg)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await?.json().await.map_err(transport)
    }
}

impl<P: TokenProvider> FileStore for DropboxFileStore<P> {
    async fn list(&self) -> Result<Vec<RemoteFile>, StoreError> {
        let mut files = Vec::new();
        let mut endpoint = "files/list_folder";
        let mut body = json!({ "path": "" });
        loop {
            let page: ListFolderResponse =
                self.rpc(endpoint, body).await?.json().await.map_err(transport)?;
            files.extend(page.entries.into_iter().filter_map(Entry::into_remote_file));
            if !page.has_more {
                break;
            }
            endpoint = "files/list_folder/continue";
            body = json!({ "cursor": page.cursor });
        }
        debug!(count = files.len(), "listed dropbox folder");
        Ok(files)
    }

    async fn metadata(&self, id: &FileId) -> Result<RemoteFile, StoreError> {
        let entry: Entry = self
            .rpc("files/get_metadata", json!({ "path": id.as_str() }))
            .await?
            .json()
            .await
            .map_err(transport)?;
        entry
            .into_remote_file()
            .ok_or_else(|| StoreError::Transport(format!("'{id}' is not a file")))
    }

    async fn create(&self, name: &str, bytes: &[u8]) -> Result<RemoteFile, StoreError> {
        let meta = self
            .upload_inner(&format!("/{name}"), "add", bytes.to_vec())
            .await?;
        debug!(name = %meta.name, "created dropbox file");
        Ok(RemoteFile {
            id: FileId::new(meta.id),
            name: meta.name,
            modified: meta.server_modified,
        })
    }

    async fn download(&self, id: &FileId) -> Result<(Vec<u8>, DateTime<Utc>), StoreError> {
        let token = self.token()?;
        let arg = json!({ "path": id.as_str() }).to_string();
        let response = self
            .http
            .post(format!("{}/files/download", self.content_base))
            .bearer_auth(token)
            .header("Dropbox-API-Arg", arg)
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;
        // Metadata rides along in a response header; the body is the file.
        let meta: FileMetadata = response
            .headers()
            .get("dropbox-api-result")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| serde_json::from_str(s).ok())
            .ok_or_else(|| StoreError::Transport("missing dropbox-api-result header".into()))?;
        let bytes = response.bytes().await.map_err(transport)?;
        Ok((bytes.to_vec(), meta.server_modified))
    }

    async fn upload(&self, id: &FileId, bytes: &[u8]) -> Result<DateTime<Utc>, StoreError> {
        let meta = self
            .upload_inner(id.as_str(), "overwrite", bytes.to_vec())
            .await?;
        Ok(meta.server_modified)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(StoreError::Auth("bearer token rejected".into()));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StoreError::Transport(format!("http {status}: {body}")));
    }
    Ok(response)
}

fn transport(e: reqwest::Error) -> StoreError {
    StoreError::Transport(e.to_string())
}

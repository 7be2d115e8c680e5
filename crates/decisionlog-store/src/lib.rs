pub mod auth;
pub mod client;
pub mod dir;
pub mod dropbox;
pub mod error;
pub mod local;
pub mod naming;
pub mod remote;
pub mod session;

pub use client::StoreClient;
pub use error::StoreError;
pub use remote::{FileId, FileStore, RemoteFile};
pub use session::Session;

use crate::commands::Backend;
use anyhow::Result;
use decisionlog_core::normalize::Normalized;
use decisionlog_store::{local, StoreClient};
use std::path::PathBuf;

pub async fn run(
    client: &StoreClient<Backend>,
    path: PathBuf,
    username: Option<String>,
) -> Result<()> {
    let Normalized { mut document, repairs } = local::import_file(&path)?;
    if let Some(username) = username {
        document.meta.username = username;
    }
    let file = client.create_document(&document).await?;

    if repairs.is_empty() {
        println!("Imported {} as {}", path.display(), file.name);
    } else {
        println!(
            "Imported {} as {} ({} repairs applied)",
            path.display(),
            file.name,
            repairs.len()
        );
    }
    Ok(())
}

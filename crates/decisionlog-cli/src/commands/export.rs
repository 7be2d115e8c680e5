use crate::commands::{resolve_file, Backend};
use anyhow::{Context, Result};
use decisionlog_store::{local, Session, StoreClient};
use std::path::PathBuf;

pub async fn run(client: &StoreClient<Backend>, file: String, path: PathBuf) -> Result<()> {
    let file = resolve_file(client, &file).await?;
    let mut session = Session::new();
    client.open(&file, &mut session).await?;

    let document = session.document().context("no document open")?;
    local::export_file(&path, document)?;
    println!("Exported {} to {}", file.name, path.display());
    Ok(())
}

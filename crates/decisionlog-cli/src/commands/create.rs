use crate::commands::Backend;
use anyhow::Result;
use decisionlog_core::document::Document;
use decisionlog_store::StoreClient;

pub async fn run(client: &StoreClient<Backend>, username: String) -> Result<()> {
    let document = Document::new(username);
    let file = client.create_document(&document).await?;
    println!("Created {} ({})", file.name, file.id);
    Ok(())
}

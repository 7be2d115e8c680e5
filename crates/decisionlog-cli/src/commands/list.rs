use crate::commands::Backend;
use anyhow::Result;
use decisionlog_store::StoreClient;

pub async fn run(client: &StoreClient<Backend>) -> Result<()> {
    let files = client.list_candidate_files().await?;
    if files.is_empty() {
        println!("No document files yet");
        return Ok(());
    }
    for file in files {
        println!(
            "{}  {}",
            file.modified.format("%Y-%m-%d %H:%M:%S"),
            file.name
        );
    }
    Ok(())
}

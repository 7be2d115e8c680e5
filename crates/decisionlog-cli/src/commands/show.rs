use crate::commands::{resolve_file, short, Backend};
use anyhow::{Context, Result};
use decisionlog_store::{Session, StoreClient};

pub async fn run(client: &StoreClient<Backend>, file: String, json: bool) -> Result<()> {
    let file = resolve_file(client, &file).await?;
    let mut session = Session::new();
    let repairs = client.open(&file, &mut session).await?;
    let document = session.document().context("no document open")?;

    if json {
        println!("{}", serde_json::to_string_pretty(document)?);
        return Ok(());
    }

    let meta = &document.meta;
    println!(
        "{} (owner: {}, updated {})",
        file.name,
        meta.username,
        meta.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
    if !repairs.is_empty() {
        println!("  ({} repairs applied during load)", repairs.len());
    }
    if document.decisions.is_empty() {
        println!("No decisions yet");
        return Ok(());
    }
    for decision in &document.decisions {
        println!(
            "{}  {}  [{}] {}",
            short(&decision.id),
            decision.date,
            decision.importance,
            decision.title
        );
        for review in &decision.reviews {
            println!(
                "    review {}  outcome {} thesis {} luck {}  {}",
                short(&review.id),
                review.outcome_rating,
                review.thesis_accuracy,
                review.luck_rating,
                review.notes
            );
        }
    }
    Ok(())
}

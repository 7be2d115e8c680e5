use crate::commands::{resolve_file, save_session, short, Backend};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use decisionlog_core::document::{Decision, DecisionDraft};
use decisionlog_store::{Session, StoreClient};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    client: &StoreClient<Backend>,
    file: String,
    title: String,
    description: Option<String>,
    final_decision: Option<String>,
    date: Option<NaiveDate>,
    importance: i64,
    tags: Vec<String>,
    force: bool,
) -> Result<()> {
    let file = resolve_file(client, &file).await?;
    let mut session = Session::new();
    client.open(&file, &mut session).await?;

    let decision = Decision::create(DecisionDraft {
        title,
        description: description.unwrap_or_default(),
        final_decision: final_decision.unwrap_or_default(),
        date: date.unwrap_or_else(|| Utc::now().date_naive()),
        importance,
        tags,
    })?;
    let id = decision.id.clone();

    session
        .document_mut()
        .context("no document open")?
        .add_decision(decision);
    save_session(client, &mut session, force).await?;

    println!("Recorded decision {} in {}", short(&id), file.name);
    Ok(())
}

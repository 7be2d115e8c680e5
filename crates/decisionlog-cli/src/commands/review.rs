use crate::commands::{find_decision_id, resolve_file, save_session, short, Backend};
use anyhow::{Context, Result};
use decisionlog_core::document::{Review, ReviewDraft};
use decisionlog_store::{Session, StoreClient};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    client: &StoreClient<Backend>,
    file: String,
    decision: String,
    outcome: i64,
    thesis: i64,
    luck: i64,
    notes: Option<String>,
    force: bool,
) -> Result<()> {
    let file = resolve_file(client, &file).await?;
    let mut session = Session::new();
    client.open(&file, &mut session).await?;

    let document = session.document_mut().context("no document open")?;
    let decision_id = find_decision_id(document, &decision)?;

    let review = Review::create(ReviewDraft {
        outcome_rating: outcome,
        thesis_accuracy: thesis,
        luck_rating: luck,
        notes: notes.unwrap_or_default(),
    })?;
    let review_id = review.id.clone();

    document
        .decision_mut(&decision_id)
        .context("decision not found")?
        .add_review(review);
    save_session(client, &mut session, force).await?;

    println!(
        "Recorded review {} for decision {}",
        short(&review_id),
        short(&decision_id)
    );
    Ok(())
}

use crate::commands::{find_decision_id, resolve_file, save_session, short, Backend};
use anyhow::{bail, Context, Result};
use decisionlog_store::{Session, StoreClient};

pub async fn run(
    client: &StoreClient<Backend>,
    file: String,
    decision: String,
    review: Option<String>,
    force: bool,
) -> Result<()> {
    let file = resolve_file(client, &file).await?;
    let mut session = Session::new();
    client.open(&file, &mut session).await?;

    let document = session.document_mut().context("no document open")?;
    let decision_id = find_decision_id(document, &decision)?;

    match review {
        Some(review_id) => {
            let target = document
                .decision_mut(&decision_id)
                .context("decision not found")?;
            if !target.remove_review(&review_id) {
                bail!(
                    "no review '{}' on decision {}",
                    review_id,
                    short(&decision_id)
                );
            }
            save_session(client, &mut session, force).await?;
            println!(
                "Removed review {} from decision {}",
                short(&review_id),
                short(&decision_id)
            );
        }
        None => {
            document.remove_decision(&decision_id);
            save_session(client, &mut session, force).await?;
            println!("Removed decision {}", short(&decision_id));
        }
    }
    Ok(())
}

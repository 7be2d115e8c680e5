mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "decisionlog",
    about = "Decision journal synced to a user-controlled file store",
    version
)]
struct Cli {
    /// Local directory store (falls back to DECISIONLOG_DIR, then ./decisionlog)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Use the Dropbox store (token from DECISIONLOG_DROPBOX_TOKEN)
    #[arg(long, global = true)]
    dropbox: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new document file for a user
    Create {
        /// Owner recorded in the document
        #[arg(long)]
        username: String,
    },

    /// List document files, newest first
    List,

    /// Print a document
    Show {
        /// File name or id
        file: String,

        /// Print the raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Append a decision to a document
    Decide {
        /// File name or id
        file: String,

        /// Decision title
        #[arg(short, long)]
        title: String,

        /// Longer reasoning
        #[arg(long)]
        description: Option<String>,

        /// What was ultimately decided
        #[arg(long)]
        final_decision: Option<String>,

        /// Decision date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Importance 0-5
        #[arg(long, default_value_t = 0)]
        importance: i64,

        /// Tags (repeatable)
        #[arg(long)]
        tag: Vec<String>,

        /// Overwrite even if the remote file changed since last sync
        #[arg(long)]
        force: bool,
    },

    /// Append a review to a decision
    Review {
        /// File name or id
        file: String,

        /// Decision id (full or prefix)
        #[arg(long)]
        decision: String,

        /// How well the outcome turned out (0-5)
        #[arg(long)]
        outcome: i64,

        /// How accurate the original thesis was (0-5)
        #[arg(long)]
        thesis: i64,

        /// How much luck was involved (0-5)
        #[arg(long)]
        luck: i64,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Overwrite even if the remote file changed since last sync
        #[arg(long)]
        force: bool,
    },

    /// Remove a decision, or one of its reviews
    Remove {
        /// File name or id
        file: String,

        /// Decision id (full or prefix)
        #[arg(long)]
        decision: String,

        /// Review id; removes the whole decision when absent
        #[arg(long)]
        review: Option<String>,

        /// Overwrite even if the remote file changed since last sync
        #[arg(long)]
        force: bool,
    },

    /// Import a local JSON file as a new document file
    Import {
        /// Path to the JSON file
        path: PathBuf,

        /// Override the owner recorded in the imported document
        #[arg(long)]
        username: Option<String>,
    },

    /// Export a document to a local JSON file
    Export {
        /// File name or id
        file: String,

        /// Destination path
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = match commands::backend(cli.dir, cli.dropbox) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Create { username } => commands::create::run(&client, username).await,
        Commands::List => commands::list::run(&client).await,
        Commands::Show { file, json } => commands::show::run(&client, file, json).await,
        Commands::Decide {
            file,
            title,
            description,
            final_decision,
            date,
            importance,
            tag,
            force,
        } => {
            commands::decide::run(
                &client,
                file,
                title,
                description,
                final_decision,
                date,
                importance,
                tag,
                force,
            )
            .await
        }
        Commands::Review {
            file,
            decision,
            outcome,
            thesis,
            luck,
            notes,
            force,
        } => {
            commands::review::run(&client, file, decision, outcome, thesis, luck, notes, force)
                .await
        }
        Commands::Remove {
            file,
            decision,
            review,
            force,
        } => commands::remove::run(&client, file, decision, review, force).await,
        Commands::Import { path, username } => {
            commands::import::run(&client, path, username).await
        }
        Commands::Export { file, path } => commands::export::run(&client, file, path).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

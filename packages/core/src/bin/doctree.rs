//! Document tree inspection tool
//!
//! Loads a project snapshot (a JSON array of documents) into the in-memory
//! store and runs one engine operation against it. Useful for replaying a
//! drag-and-drop against exported data before touching a real database.
//!
//! # Usage
//!
//! ```bash
//! # Print the placement updates a drop would produce
//! cargo run --bin doctree -- move snapshot.json <source-id> <target-id> [--reparent]
//!
//! # Print the documents a deletion removes and the re-placed survivors
//! cargo run --bin doctree -- delete snapshot.json <document-id>
//!
//! # Print the nested tree
//! cargo run --bin doctree -- tree snapshot.json
//!
//! # List broken invariants (exit code 1 if any)
//! cargo run --bin doctree -- check snapshot.json
//! ```
//!
//! # Configuration
//!
//! `--config <file.json>` loads a `TreeConfig`; otherwise
//! `TEAMSPACE_DELETE_POLICY` and `TEAMSPACE_MAX_SLUG_ATTEMPTS` override the
//! defaults. Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use teamspace_core::db::InMemoryDocumentStore;
use teamspace_core::services::DocumentService;
use teamspace_core::tree::MoveRequest;
use teamspace_core::{Document, TreeConfig};
use tracing_subscriber::EnvFilter;

/// Replay document tree operations against a JSON snapshot
#[derive(Parser, Debug)]
#[command(name = "doctree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with engine settings (defaults plus TEAMSPACE_* env otherwise)
    #[arg(long, global = true, env = "TEAMSPACE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the placement updates produced by dropping SOURCE on TARGET
    Move {
        /// Project snapshot (JSON array of documents)
        snapshot: PathBuf,

        /// The dragged document
        source: String,

        /// The document it is dropped on
        target: String,

        /// Nest under the target instead of placing before it
        #[arg(long)]
        reparent: bool,
    },

    /// Print the removal plan for deleting a document
    Delete {
        /// Project snapshot (JSON array of documents)
        snapshot: PathBuf,

        /// Document to delete
        id: String,
    },

    /// Print the nested tree
    Tree {
        /// Project snapshot (JSON array of documents)
        snapshot: PathBuf,
    },

    /// List broken invariants, exiting with 1 if there are any
    Check {
        /// Project snapshot (JSON array of documents)
        snapshot: PathBuf,
    },
}

impl Command {
    fn snapshot(&self) -> &Path {
        match self {
            Command::Move { snapshot, .. }
            | Command::Delete { snapshot, .. }
            | Command::Tree { snapshot }
            | Command::Check { snapshot } => snapshot,
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<TreeConfig> {
    match path {
        Some(path) => TreeConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => TreeConfig::from_env().context("invalid TEAMSPACE_* configuration"),
    }
}

fn load_snapshot(path: &Path) -> anyhow::Result<(String, Vec<Document>)> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let documents: Vec<Document> =
        serde_json::from_str(&raw).context("snapshot must be a JSON array of documents")?;

    let Some(first) = documents.first() else {
        bail!("snapshot {} is empty", path.display());
    };
    let project_id = first.project_id.clone();
    if documents.iter().any(|d| d.project_id != project_id) {
        bail!("snapshot mixes documents from several projects");
    }

    Ok((project_id, documents))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;
    let (project_id, documents) = load_snapshot(cli.command.snapshot())?;
    tracing::info!(
        "Loaded {} document(s) of project '{}'",
        documents.len(),
        project_id
    );

    let store = Arc::new(InMemoryDocumentStore::with_documents(documents));
    let service = DocumentService::with_config(store, config);

    let output = match &cli.command {
        Command::Move {
            source,
            target,
            reparent,
            ..
        } => {
            let outcome = service
                .move_document(&project_id, &MoveRequest::new(source, target, *reparent))
                .await?;
            json!({ "noop": outcome.is_noop(), "updates": outcome.updates() })
        }
        Command::Delete { id, .. } => {
            let plan = service.delete_document(&project_id, id).await?;
            json!({ "deletedIds": plan.deleted_ids, "updates": plan.updates })
        }
        Command::Tree { .. } => serde_json::to_value(service.nested_tree(&project_id).await?)?,
        Command::Check { .. } => {
            let violations = service.check_tree(&project_id).await?;
            if violations.is_empty() {
                println!("ok");
                return Ok(());
            }
            for violation in &violations {
                println!("{}", violation);
            }
            std::process::exit(1);
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

//! prepdocs: section text documents and load them into the search index.
//!
//! Each input file is uploaded to blob storage (unless `--skip-blobs`), split
//! into overlapping sections and indexed in batches. `--remove` and
//! `--remove-all` take sections (and blobs) out again.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use docqa_core::config::{load_dotenv, Config};
use docqa_ingest::document::{discover_documents, removal_targets};
use docqa_ingest::{IngestSettings, Indexer};
use docqa_search::AzureSearchClient;
use docqa_storage::{ObjectBlobStore, StorageBackend};

// ── CLI ─────────────────────────────────────────────────────────────

/// Prepare documents for question answering: section them and load the
/// sections into the search index.
#[derive(Parser, Debug)]
#[command(name = "prepdocs", version, about)]
struct Cli {
    /// Files or directories to process. Directories contribute their *.txt files.
    /// Defaults to DOCS_DIR.
    paths: Vec<PathBuf>,

    /// Category stamped on every section.
    #[arg(long)]
    category: Option<String>,

    /// Index name (overrides SEARCH_INDEX).
    #[arg(long)]
    index: Option<String>,

    /// Do not upload originals to blob storage.
    #[arg(long)]
    skip_blobs: bool,

    /// Remove the given files from the index (and blob storage) instead of indexing.
    #[arg(long, conflicts_with = "remove_all")]
    remove: bool,

    /// Remove every section from the index (and every blob).
    #[arg(long)]
    remove_all: bool,

    /// Print progress.
    #[arg(long, short)]
    verbose: bool,

    /// Target section length in characters.
    #[arg(long)]
    max_section_length: Option<usize>,

    /// How far past the target length to look for a sentence end.
    #[arg(long)]
    sentence_search_limit: Option<usize>,

    /// Characters shared by consecutive sections.
    #[arg(long)]
    section_overlap: Option<usize>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(category) = &self.category {
            config.ingest.category = category.clone();
        }
        if let Some(index) = &self.index {
            config.search.index = index.clone();
        }
        if let Some(v) = self.max_section_length {
            config.ingest.max_section_length = v;
        }
        if let Some(v) = self.sentence_search_limit {
            config.ingest.sentence_search_limit = v;
        }
        if let Some(v) = self.section_overlap {
            config.ingest.section_overlap = v;
        }
        config.ingest.verbose |= self.verbose;
    }
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let cli = Cli::parse();
    let mut config = Config::from_env();
    cli.apply(&mut config);

    let default_level = if config.ingest.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
    config.log_summary();

    let search = AzureSearchClient::from_config(&config.search)
        .context("search service is not configured")?;
    let mut indexer = Indexer::new(Arc::new(search), IngestSettings::from_config(&config.ingest))?;

    if !cli.skip_blobs {
        let backend = StorageBackend::from_config(&config.blob)?;
        let blobs = ObjectBlobStore::new(&backend);
        if !backend.is_remote() {
            warn!("Azure storage not configured, keeping originals in {}", blobs.location());
        }
        indexer = indexer.with_blobs(Arc::new(blobs));
    }

    if cli.remove_all {
        let removed = indexer.remove_all().await?;
        info!("Removed {} sections", removed);
        return Ok(());
    }

    let paths = if cli.paths.is_empty() {
        vec![config.ingest.docs_dir.clone()]
    } else {
        cli.paths.clone()
    };

    if cli.remove {
        // Files may already be gone locally; their names still select sections.
        for name in removal_targets(&paths)? {
            let removed = indexer.remove_file(&name).await?;
            info!("Removed {} sections of '{}'", removed, name);
        }
        return Ok(());
    }

    let files = discover_documents(&paths)?;
    if files.is_empty() {
        warn!("No documents found in {:?}", paths);
        return Ok(());
    }

    indexer.ensure_index().await?;

    let (mut sections, mut succeeded) = (0, 0);
    for file in &files {
        let report = indexer
            .process_file(file)
            .await
            .with_context(|| format!("failed to index {}", file.display()))?;
        sections += report.sections;
        succeeded += report.succeeded;
    }
    info!(
        "Indexed {} files: {} sections, {} succeeded",
        files.len(),
        sections,
        succeeded
    );
    if succeeded < sections {
        anyhow::bail!("{} sections failed to index", sections - succeeded);
    }
    Ok(())
}

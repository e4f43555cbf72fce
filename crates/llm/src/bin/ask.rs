//! ask: answer a question from the indexed documents.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use docqa_core::config::{load_dotenv, Config};
use docqa_llm::answer::DEFAULT_TOP;
use docqa_llm::{create_provider, Answerer};
use docqa_search::{field_eq_filter, AzureSearchClient};

/// Answer a question using the sections in the search index.
#[derive(Parser, Debug)]
#[command(name = "ask", version, about)]
struct Cli {
    /// The question to answer.
    #[arg(required = true)]
    question: Vec<String>,

    /// Number of sections to retrieve.
    #[arg(long, default_value_t = DEFAULT_TOP)]
    top: usize,

    /// Only use sections of this category.
    #[arg(long)]
    category: Option<String>,

    /// Print retrieval and request details.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
            }),
        )
        .init();

    let config = Config::from_env();
    config.log_summary();

    let search = AzureSearchClient::from_config(&config.search)
        .context("search service is not configured")?;
    let provider = create_provider(&config.llm)?;

    let mut answerer = Answerer::new(Arc::new(search), provider).with_top(cli.top);
    if let Some(category) = &cli.category {
        answerer = answerer.with_filter(field_eq_filter("category", category));
    }

    let question = cli.question.join(" ");
    let answer = answerer.ask(&question).await?;

    println!("{}", answer.text);
    if !answer.sources.is_empty() {
        println!("\nSources: {}", answer.sources.join(", "));
    }
    Ok(())
}

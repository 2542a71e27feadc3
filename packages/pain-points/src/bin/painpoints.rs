//! Operator CLI for the pain-point engine.
//!
//! Every subcommand prints JSON to stdout; logs go to stderr.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use pain_points::{
    rerank_all, BatchAnalyzer, OpenAiExtractor, PainPointStore, PipelineConfig, PostgresStore,
    Thread, ThreadSource,
};

#[derive(Parser)]
#[command(name = "painpoints")]
#[command(about = "Extract, deduplicate, and rank pain points from social threads")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load threads from a JSON array file into the thread table
    Import { path: PathBuf },

    /// Extract and merge pain points from the given thread ids
    Analyze {
        #[arg(required = true)]
        thread_ids: Vec<String>,
    },

    /// Rescore every pain point with the batch formula
    Rerank,

    /// List the highest-ranked pain points
    Top {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
struct Config {
    database_url: String,
    openai_model: String,
    pipeline: PipelineConfig,
}

impl Config {
    fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let mut pipeline = PipelineConfig::default();
        if let Ok(raw) = env::var("DUPLICATE_SIMILARITY_THRESHOLD") {
            let threshold: f64 = raw
                .parse()
                .context("DUPLICATE_SIMILARITY_THRESHOLD must be a number")?;
            pipeline = pipeline
                .with_similarity_threshold(threshold)
                .context("Invalid DUPLICATE_SIMILARITY_THRESHOLD")?;
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| pain_points::ai::DEFAULT_MODEL.to_string()),
            pipeline,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportResponse {
    imported: usize,
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store = Arc::new(
        PostgresStore::new(&config.database_url)
            .await
            .context("Failed to connect to database")?,
    );

    match cli.command {
        Commands::Import { path } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let threads: Vec<Thread> =
                serde_json::from_str(&raw).context("Thread file must be a JSON array of threads")?;
            for thread in &threads {
                store
                    .store_thread(thread)
                    .await
                    .with_context(|| format!("Failed to store thread {}", thread.id))?;
            }
            print_json(&ImportResponse {
                imported: threads.len(),
            })
        }
        Commands::Analyze { thread_ids } => {
            let extractor = OpenAiExtractor::from_env()
                .context("OPENAI_API_KEY must be set")?
                .with_model(&config.openai_model);
            let analyzer =
                BatchAnalyzer::with_config(store.clone(), store, extractor, config.pipeline);
            print_json(&analyzer.analyze(thread_ids.as_slice()).await)
        }
        Commands::Rerank => {
            let summary = rerank_all(store.as_ref()).await.context("Rerank failed")?;
            print_json(&summary)
        }
        Commands::Top { limit } => {
            let ranked = store
                .list_ranked(Some(limit))
                .await
                .context("Failed to list pain points")?;
            print_json(&ranked)
        }
    }
}

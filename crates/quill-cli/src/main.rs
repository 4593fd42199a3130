//! quill - enrich documents from the command line.
//!
//! Prints one JSON enrichment record per input file on stdout, in
//! argument order. Logs go to stderr.
//!
//! # Configuration
//!
//! - `HF_TOKEN` - enables remote summaries (local summaries otherwise)
//! - `QUILL_HF_MODEL`, `QUILL_OCR_*`, `QUILL_DISABLE_REMOTE` - overrides
//! - `RUST_LOG` - log filter, defaults to `info`
//!
//! A `.env` file in the working directory is honoured.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use quill_core::{EnrichConfig, Enricher, EnrichmentRecord};
use quill_extractors::Document;
use quill_llm::SummarizerFactory;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Documents to enrich (.txt, .md, .docx, .pdf).
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Configuration file (.toml, .json or .yaml). Environment variables
    /// override it.
    #[arg(short, long, env = "QUILL_CONFIG")]
    config: Option<PathBuf>,

    /// Never call the remote summarizer.
    #[arg(long)]
    no_remote: bool,

    /// Pretty-print records.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the records
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let service = SummarizerFactory::from_config(&config)?;
    let enricher = Arc::new(Enricher::from_config(&config, service)?);

    // Documents are independent; each gets its own task.
    let tasks: Vec<_> = args
        .files
        .iter()
        .cloned()
        .map(|path| {
            let enricher = Arc::clone(&enricher);
            tokio::spawn(async move { enrich_file(&enricher, &path).await })
        })
        .collect();

    let mut failed = 0usize;
    for (path, task) in args.files.iter().zip(tasks) {
        match task.await.context("enrichment task panicked")? {
            Ok(record) => println!("{}", render(&record, args.pretty)?),
            Err(e) => {
                failed += 1;
                error!(path = %path.display(), error = %e, "Failed to enrich document");
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} document(s) failed", failed, args.files.len());
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<EnrichConfig> {
    let mut config = match &args.config {
        Some(path) => EnrichConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EnrichConfig::default(),
    };
    config.apply_env();
    if args.no_remote {
        config.summary.enable_remote = false;
    }
    Ok(config)
}

async fn enrich_file(enricher: &Enricher, path: &Path) -> Result<EnrichmentRecord> {
    let document =
        Document::from_path(path).with_context(|| format!("reading {}", path.display()))?;
    info!(path = %path.display(), bytes = document.size(), "Enriching document");

    enricher
        .enrich(&document)
        .await
        .map_err(|e| anyhow::anyhow!("{} ({})", e, e.code().as_str()))
}

fn render(record: &EnrichmentRecord, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };
    Ok(json)
}

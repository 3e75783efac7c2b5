//! One-shot price lookup from the command line.
//!
//! Runs a single query through the same pipeline as the server, using
//! in-memory stores, and prints the listings as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use pricehawk::application::services::{AggregationService, WorkerPool};
use pricehawk::config::Settings;
use pricehawk::infrastructure::persistence::in_memory::{InMemoryHistoryLog, InMemorySnapshotStore};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(name = "pricehawk-query", about = "Look up prices for one query")]
struct QueryOpts {
    /// Search text, e.g. "iPhone 15".
    query: String,

    /// Settings file.
    #[clap(long)]
    config: Option<String>,

    /// Override the overall deadline.
    #[clap(long)]
    deadline_ms: Option<u64>,

    /// Disable fallback search links.
    #[clap(long)]
    no_fallback: bool,

    /// Pretty-print the JSON output.
    #[clap(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pricehawk=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = QueryOpts::parse();
    let mut settings = Settings::load(opts.config.as_deref())?;
    if let Some(ms) = opts.deadline_ms {
        settings.aggregation = settings.aggregation.with_overall_deadline_ms(ms);
    }
    if opts.no_fallback {
        settings.aggregation = settings.aggregation.with_fallback(false);
    }
    settings.validate()?;

    let pool = WorkerPool::new(settings.worker_pool)?;
    let mut service = AggregationService::new(
        &settings.aggregation,
        pool.clone(),
        settings.vendor_clients()?,
        settings.vendor_profiles()?,
        Arc::new(InMemorySnapshotStore::new()),
        Arc::new(InMemoryHistoryLog::new()),
    );
    if let Some(source) = settings.enrichment_source()? {
        service = service.with_enrichment(source);
    }

    let result = service.fetch_pricing(&opts.query).await?;
    let json = if opts.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .context("encoding result")?;
    println!("{json}");

    pool.shutdown(Duration::from_secs(2)).await;
    Ok(())
}

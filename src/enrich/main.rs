//! Proximity enrichment job.
//!
//! Loads a point file, removes near-duplicate points, then walks the
//! survivors computing travel distances for plausibly-close pairs
//! through the HERE Routing API, under a hard per-run call budget.
//! Interrupted runs resume from the persisted `processed` flags.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use copse::dedup::ProximityDeduplicator;
use copse::models::RunOutput;
use copse::oracle::HereRouter;
use copse::pipeline::{EnrichmentConfig, EnrichmentPipeline};
use copse::store;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "enrich")]
#[command(about = "Deduplicate points and enrich close pairs with travel distances")]
struct Args {
    /// Input point file (JSON). Rewritten at run end with updated
    /// processed flags so interrupted runs can resume.
    #[arg(short, long)]
    points: PathBuf,

    /// Results output file
    #[arg(short, long, default_value = "distances.json")]
    output: PathBuf,

    /// Optional TOML job config
    #[arg(long)]
    config: Option<PathBuf>,

    /// HERE API key (falls back to the HERE_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Only deduplicate: write the surviving points to the output file
    /// and exit without touching the oracle
    #[arg(long)]
    dedup_only: bool,

    /// Duplicate-removal threshold in meters
    #[arg(long)]
    duplicate_threshold_m: Option<f64>,

    /// Candidate band lower bound in km
    #[arg(long)]
    band_min_km: Option<f64>,

    /// Candidate band upper bound in km
    #[arg(long)]
    band_max_km: Option<f64>,

    /// Maximum travel distance recorded as an edge, in km
    #[arg(long)]
    accept_km: Option<f64>,

    /// Hard ceiling on oracle calls for this run
    #[arg(long)]
    call_budget: Option<u32>,

    /// Minimum delay between oracle calls, in milliseconds
    #[arg(long)]
    inter_call_delay_ms: Option<u64>,

    /// Routing transport mode (pedestrian, car, bicycle, ...)
    #[arg(long)]
    transport_mode: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    // CLI flags override the config file
    if let Some(v) = args.duplicate_threshold_m {
        config.job.duplicate_threshold_m = v;
    }
    if let Some(v) = args.band_min_km {
        config.job.band_min_km = v;
    }
    if let Some(v) = args.band_max_km {
        config.job.band_max_km = v;
    }
    if let Some(v) = args.accept_km {
        config.job.accept_km = v;
    }
    if let Some(v) = args.call_budget {
        config.job.call_budget = v;
    }
    if let Some(v) = args.inter_call_delay_ms {
        config.job.inter_call_delay_ms = v;
    }
    if let Some(v) = args.transport_mode.clone() {
        config.oracle.transport_mode = v;
    }

    info!("Copse Enrichment Job");
    info!("Points: {}", args.points.display());

    let points = store::load_points(&args.points)?;

    let dedup = ProximityDeduplicator::new(config.job.duplicate_threshold_m);
    let mut points = dedup.dedup(&points);

    if args.dedup_only {
        store::save_points(&args.output, &points)?;
        info!(
            "Dedup-only mode: wrote {} surviving points to {}",
            points.len(),
            args.output.display()
        );
        return Ok(());
    }

    let api_key = args
        .api_key
        .or_else(|| config.oracle.api_key.clone())
        .or_else(|| std::env::var("HERE_API_KEY").ok())
        .context("No API key given (use --api-key, the config file, or HERE_API_KEY)")?;

    let oracle = HereRouter::new(api_key, config.oracle.transport_mode.clone());

    let pipeline_config = EnrichmentConfig {
        band_min_km: config.job.band_min_km,
        band_max_km: config.job.band_max_km,
        accept_km: config.job.accept_km,
        call_budget: config.job.call_budget,
        inter_call_delay_ms: config.job.inter_call_delay_ms,
    };
    let mut pipeline = EnrichmentPipeline::new(pipeline_config, oracle);

    let report = pipeline.run(&mut points).await;

    let output = RunOutput {
        generated_at: Utc::now(),
        oracle_calls: report.oracle_calls,
        results: report.results,
    };
    store::save_results(&args.output, &output)?;

    // Persist processed flags so the next run skips completed points
    store::save_points(&args.points, &points)?;

    info!(
        "Done: {} oracle calls, {} edges recorded{}",
        report.oracle_calls,
        report.edges_recorded,
        if report.budget_exhausted {
            ", budget exhausted (re-run to continue)"
        } else {
            ""
        }
    );

    Ok(())
}

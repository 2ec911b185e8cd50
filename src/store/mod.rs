//! JSON persistence for point files and run output.
//!
//! Points are loaded once at run start and written back once at run end
//! with their updated `processed` flags, which is what makes interrupted
//! runs resumable. Results are written once, at the end.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

use crate::models::{PointRecord, RunOutput};

/// Load the input point set. Any read or parse failure is fatal to the
/// run; nothing is processed on bad input.
pub fn load_points<P: AsRef<Path>>(path: P) -> Result<Vec<PointRecord>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open point file {}", path.display()))?;
    let points: Vec<PointRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse point file {}", path.display()))?;

    info!("Loaded {} points from {}", points.len(), path.display());
    Ok(points)
}

/// Rewrite the point file with current `processed` flags.
pub fn save_points<P: AsRef<Path>>(path: P, points: &[PointRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create point file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), points)
        .with_context(|| format!("Failed to write point file {}", path.display()))?;

    info!("Saved {} points to {}", points.len(), path.display());
    Ok(())
}

/// Write the run output document.
pub fn save_results<P: AsRef<Path>>(path: P, output: &RunOutput) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create results file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), output)
        .with_context(|| format!("Failed to write results file {}", path.display()))?;

    info!(
        "Saved {} results to {}",
        output.results.len(),
        path.display()
    );
    Ok(())
}

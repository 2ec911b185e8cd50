//! Point and distance-edge structures persisted between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic point (lat/lng)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A single input point as stored in the point file.
///
/// `processed` marks a point whose candidate scan ran to the end of the
/// list in a previous run; such points are skipped on resume. Input files
/// produced upstream may omit the field entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointRecord {
    /// Unique source identifier within a run
    pub id: String,

    pub position: GeoPoint,

    /// Whether this point's candidate scan has completed
    #[serde(default)]
    pub processed: bool,
}

impl PointRecord {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            position: GeoPoint { lat, lng },
            processed: false,
        }
    }
}

/// Travel distance from one point to another, as reported by the oracle.
///
/// Edges are recorded only from the lower-indexed point's perspective and
/// never mirrored onto the partner's own result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceEdge {
    pub from_id: String,
    pub to_id: String,
    pub distance_km: f64,
}

/// Per-point enrichment output: the point (with its final `processed`
/// flag) plus every accepted distance edge rooted at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub point: PointRecord,
    pub distances: Vec<DistanceEdge>,
}

/// Top-level output document written once at run end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    /// Run timestamp for tracking across resumed runs
    pub generated_at: DateTime<Utc>,

    /// Oracle calls issued during this run
    pub oracle_calls: u32,

    pub results: Vec<EnrichmentResult>,
}

//! Budgeted enrichment pipeline.
//!
//! Walks the deduplicated point list in input order and, for each point,
//! scans every later-indexed partner. Partners inside the candidate band
//! get a travel-distance lookup against the oracle; everything else is
//! pruned on the cheap great-circle estimate alone. A hard per-run call
//! budget caps the total number of oracle calls.
//!
//! Per-point lifecycle within a run:
//!
//! - Pending: not yet scanned (or carried over `processed` from a prior
//!   run, in which case the point is skipped outright).
//! - Scanning: the partner scan is in progress.
//! - Complete: the scan reached the end of the list; `processed` is set
//!   so the next run skips the point.
//! - Interrupted: the budget tripped mid-scan; `processed` stays false
//!   and the whole run halts, leaving later points Pending for a re-run.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::geo;
use crate::models::{DistanceEdge, EnrichmentResult, GeoPoint, PointRecord};
use crate::oracle::DistanceOracle;

/// Great-circle pre-filter deciding whether a pair is worth an oracle
/// lookup. The great-circle distance is a lower bound on any real travel
/// distance, so pruning on it never discards a pair that could have
/// passed the final acceptance threshold.
#[derive(Debug, Clone, Copy)]
pub struct CandidateFilter {
    band_min_km: f64,
    band_max_km: f64,
}

impl CandidateFilter {
    pub fn new(band_min_km: f64, band_max_km: f64) -> Self {
        Self {
            band_min_km,
            band_max_km,
        }
    }

    /// Strict band check on a precomputed great-circle distance.
    pub fn accepts_km(&self, distance_km: f64) -> bool {
        distance_km > self.band_min_km && distance_km < self.band_max_km
    }

    pub fn worth_lookup(&self, a: &GeoPoint, b: &GeoPoint) -> bool {
        self.accepts_km(geo::distance_km(a, b))
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::new(0.2, 3.0)
    }
}

/// Tunable knobs for one enrichment run.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Lower bound of the candidate band (km, exclusive)
    pub band_min_km: f64,
    /// Upper bound of the candidate band (km, exclusive)
    pub band_max_km: f64,
    /// Maximum travel distance worth recording as an edge (km)
    pub accept_km: f64,
    /// Hard ceiling on oracle calls per run
    pub call_budget: u32,
    /// Minimum spacing between consecutive oracle calls
    pub inter_call_delay_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            band_min_km: 0.2,
            band_max_km: 3.0,
            accept_km: 5.0,
            call_budget: 500,
            inter_call_delay_ms: 1000,
        }
    }
}

/// Outcome of a single point's partner scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanOutcome {
    Complete,
    Interrupted,
}

/// Summary of one pipeline run.
#[derive(Debug)]
pub struct RunReport {
    /// One entry per point actually scanned, in scan order
    pub results: Vec<EnrichmentResult>,
    pub oracle_calls: u32,
    pub edges_recorded: usize,
    /// Whether the run halted on the call budget
    pub budget_exhausted: bool,
}

/// Orchestrates candidate filtering and oracle lookups under the call
/// budget. All run state (the call counter included) lives on the
/// instance, so independent runs never share anything.
pub struct EnrichmentPipeline<O: DistanceOracle> {
    config: EnrichmentConfig,
    filter: CandidateFilter,
    oracle: O,
    calls_made: u32,
}

impl<O: DistanceOracle> EnrichmentPipeline<O> {
    pub fn new(config: EnrichmentConfig, oracle: O) -> Self {
        let filter = CandidateFilter::new(config.band_min_km, config.band_max_km);
        Self {
            config,
            filter,
            oracle,
            calls_made: 0,
        }
    }

    pub fn calls_made(&self) -> u32 {
        self.calls_made
    }

    /// Run enrichment over the point list, mutating `processed` flags in
    /// place so the caller can persist them for resumption.
    pub async fn run(&mut self, points: &mut [PointRecord]) -> RunReport {
        info!(
            "Enrichment run over {} points (budget {} calls)",
            points.len(),
            self.config.call_budget
        );

        let pb = ProgressBar::new(points.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut results: Vec<EnrichmentResult> = Vec::new();
        let mut edges_recorded = 0;
        let mut budget_exhausted = false;

        for i in 0..points.len() {
            if self.calls_made >= self.config.call_budget {
                // Circuit breaker: once the counter hits the ceiling, no
                // further point is even attempted.
                budget_exhausted = true;
                break;
            }

            pb.inc(1);

            if points[i].processed {
                debug!("Point {}: already processed, skipping", points[i].id);
                continue;
            }

            debug!("Point {}: scanning", points[i].id);
            let (edges, outcome) = self.scan_point(points, i).await;
            edges_recorded += edges.len();

            match outcome {
                ScanOutcome::Complete => {
                    debug!(
                        "Point {}: complete ({} edges)",
                        points[i].id,
                        edges.len()
                    );
                    points[i].processed = true;
                }
                ScanOutcome::Interrupted => {
                    info!(
                        "Point {}: interrupted by call budget after {} calls",
                        points[i].id, self.calls_made
                    );
                    budget_exhausted = true;
                }
            }

            results.push(EnrichmentResult {
                point: points[i].clone(),
                distances: edges,
            });

            if outcome == ScanOutcome::Interrupted {
                break;
            }
        }

        pb.finish_and_clear();

        info!(
            "Run finished: {} oracle calls, {} edges, {} results{}",
            self.calls_made,
            edges_recorded,
            results.len(),
            if budget_exhausted {
                " (budget exhausted)"
            } else {
                ""
            }
        );

        RunReport {
            results,
            oracle_calls: self.calls_made,
            edges_recorded,
            budget_exhausted,
        }
    }

    /// Scan partners after index `i`, collecting accepted edges.
    async fn scan_point(
        &mut self,
        points: &[PointRecord],
        i: usize,
    ) -> (Vec<DistanceEdge>, ScanOutcome) {
        let mut edges = Vec::new();
        let point = &points[i];

        for partner in &points[i + 1..] {
            if !self.filter.worth_lookup(&point.position, &partner.position) {
                continue;
            }

            if self.calls_made >= self.config.call_budget {
                return (edges, ScanOutcome::Interrupted);
            }

            // Rate-limit contract with the provider: fixed spacing
            // between consecutive calls, nothing before the first.
            if self.calls_made > 0 && self.config.inter_call_delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(
                    self.config.inter_call_delay_ms,
                ))
                .await;
            }

            self.calls_made += 1;
            match self
                .oracle
                .travel_distance_km(point.position, partner.position)
                .await
            {
                Ok(km) if km <= self.config.accept_km => {
                    debug!(
                        "Edge {} -> {}: {:.2}km",
                        point.id, partner.id, km
                    );
                    edges.push(DistanceEdge {
                        from_id: point.id.clone(),
                        to_id: partner.id.clone(),
                        distance_km: km,
                    });
                }
                Ok(km) => {
                    debug!(
                        "Pair {} -> {} rejected: {:.2}km exceeds {:.2}km",
                        point.id, partner.id, km, self.config.accept_km
                    );
                }
                Err(e) => {
                    // Pair-local failure: skip, keep scanning
                    warn!(
                        "Oracle lookup {} -> {} failed: {}",
                        point.id, partner.id, e
                    );
                }
            }
        }

        (edges, ScanOutcome::Complete)
    }
}

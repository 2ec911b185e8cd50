//! Copse - batch proximity enrichment for geographic point sets
//!
//! Deduplicates near-identical points, then computes travel distances
//! between plausibly-close pairs through an external routing service,
//! under a hard per-run call budget.

pub mod dedup;
pub mod geo;
pub mod models;
pub mod oracle;
pub mod pipeline;
pub mod store;

pub use models::{DistanceEdge, EnrichmentResult, GeoPoint, PointRecord, RunOutput};
pub use pipeline::{CandidateFilter, EnrichmentConfig, EnrichmentPipeline, RunReport};

//! Core data models for the enrichment pipeline.

pub mod point;

pub use point::{DistanceEdge, EnrichmentResult, GeoPoint, PointRecord, RunOutput};

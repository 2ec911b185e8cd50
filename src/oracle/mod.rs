//! Distance oracle interface and HTTP implementation.

pub mod here;

pub use here::HereRouter;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::GeoPoint;

/// Errors local to a single oracle lookup.
///
/// None of these abort the run; the pipeline logs the failure and moves
/// on to the next candidate pair.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("oracle returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),

    #[error("no route found between the two points")]
    NoRoute,
}

/// External service returning a real-world travel distance for a
/// coordinate pair. Each call is a network round trip; the pipeline
/// serializes calls and spaces them to respect provider rate limits.
#[async_trait]
pub trait DistanceOracle: Send + Sync {
    async fn travel_distance_km(
        &self,
        origin: GeoPoint,
        dest: GeoPoint,
    ) -> Result<f64, OracleError>;
}

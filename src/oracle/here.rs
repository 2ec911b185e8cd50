//! HERE Routing v8 client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{DistanceOracle, OracleError};
use crate::models::GeoPoint;

const ROUTING_ENDPOINT: &str = "https://router.hereapi.com/v8/routes";

/// Travel distance lookup through the HERE Routing API.
pub struct HereRouter {
    client: Client,
    api_key: String,
    transport_mode: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct RoutesResponse {
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct Section {
    summary: Summary,
}

#[derive(Debug, Deserialize)]
struct Summary {
    /// Route length in meters
    length: f64,
}

impl HereRouter {
    pub fn new(api_key: String, transport_mode: String) -> Self {
        Self {
            client: Client::builder()
                .user_agent("Copse/0.1 (proximity enrichment)")
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to create HTTP client"),
            api_key,
            transport_mode,
            endpoint: ROUTING_ENDPOINT.to_string(),
        }
    }

    /// Point an instance at a different endpoint (local mock servers).
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }

    async fn fetch_route(&self, origin: GeoPoint, dest: GeoPoint) -> Result<f64, OracleError> {
        let origin_param = format!("{:.6},{:.6}", origin.lat, origin.lng);
        let dest_param = format!("{:.6},{:.6}", dest.lat, dest.lng);

        let mut attempts = 0;
        let max_attempts = 2;

        loop {
            attempts += 1;

            let response = match self
                .client
                .get(&self.endpoint)
                .query(&[
                    ("transportMode", self.transport_mode.as_str()),
                    ("origin", origin_param.as_str()),
                    ("destination", dest_param.as_str()),
                    ("return", "summary"),
                    ("apikey", self.api_key.as_str()),
                ])
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    warn!(
                        "Routing request failed (attempt {}/{}): {}",
                        attempts, max_attempts, e
                    );
                    if attempts < max_attempts {
                        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                        continue;
                    }
                    return Err(OracleError::Request(e));
                }
            };

            if !response.status().is_success() {
                let status = response.status();
                warn!(
                    "Routing request returned status {} (attempt {}/{})",
                    status, attempts, max_attempts
                );
                if attempts < max_attempts {
                    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                    continue;
                }
                return Err(OracleError::Status(status));
            }

            let data: RoutesResponse = response
                .json()
                .await
                .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;

            let route = data.routes.first().ok_or(OracleError::NoRoute)?;

            // Multi-section routes report one summary per section
            let length_m: f64 = route.sections.iter().map(|s| s.summary.length).sum();
            let km = length_m / 1000.0;

            debug!(
                "Route {} -> {} is {:.2}km",
                origin_param, dest_param, km
            );
            return Ok(km);
        }
    }
}

#[async_trait]
impl DistanceOracle for HereRouter {
    async fn travel_distance_km(
        &self,
        origin: GeoPoint,
        dest: GeoPoint,
    ) -> Result<f64, OracleError> {
        self.fetch_route(origin, dest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "routes": [{
                "sections": [
                    {"summary": {"length": 2500.0, "duration": 1800}},
                    {"summary": {"length": 1500.0, "duration": 1200}}
                ]
            }]
        }"#;
        let parsed: RoutesResponse = serde_json::from_str(body).unwrap();
        let total: f64 = parsed.routes[0]
            .sections
            .iter()
            .map(|s| s.summary.length)
            .sum();
        assert_eq!(total, 4000.0);
    }

    #[test]
    fn test_request_query_parameters() {
        let router = HereRouter::new("test-key".to_string(), "pedestrian".to_string());
        let request = router
            .client
            .get(&router.endpoint)
            .query(&[
                ("transportMode", router.transport_mode.as_str()),
                ("origin", "10.200000,106.000000"),
                ("destination", "10.218000,106.000000"),
                ("return", "summary"),
                ("apikey", router.api_key.as_str()),
            ])
            .build()
            .unwrap();

        let url = request.url().as_str();
        assert!(url.starts_with(ROUTING_ENDPOINT));
        assert!(url.contains("transportMode=pedestrian"));
        assert!(url.contains("origin=10.200000%2C106.000000"));
        assert!(url.contains("destination=10.218000%2C106.000000"));
        assert!(url.contains("return=summary"));
        assert!(url.contains("apikey=test-key"));
    }

    #[test]
    fn test_empty_routes_is_no_route() {
        let body = r#"{"routes": []}"#;
        let parsed: RoutesResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.routes.first().is_none());
    }
}

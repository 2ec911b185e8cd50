use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub job: JobConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
}

/// Job-level knobs; every field may be overridden on the command line.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct JobConfig {
    pub duplicate_threshold_m: f64,
    pub band_min_km: f64,
    pub band_max_km: f64,
    pub accept_km: f64,
    pub call_budget: u32,
    pub inter_call_delay_ms: u64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold_m: 50.0,
            band_min_km: 0.2,
            band_max_km: 3.0,
            accept_km: 5.0,
            call_budget: 500,
            inter_call_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OracleConfig {
    pub transport_mode: String,
    pub api_key: Option<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            transport_mode: "pedestrian".to_string(),
            api_key: None,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let job = JobConfig::default();
        assert_eq!(job.duplicate_threshold_m, 50.0);
        assert_eq!(job.call_budget, 500);
        assert_eq!(job.inter_call_delay_ms, 1000);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [job]
            call_budget = 100

            [oracle]
            transport_mode = "car"
            "#,
        )
        .unwrap();
        assert_eq!(config.job.call_budget, 100);
        assert_eq!(config.job.band_max_km, 3.0);
        assert_eq!(config.oracle.transport_mode, "car");
        assert!(config.oracle.api_key.is_none());
    }
}

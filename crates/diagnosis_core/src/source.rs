use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use shared::{domain::DiagnosisRecord, error::FetchError};
use tokio::sync::Mutex;
use tracing::debug;

pub const DEFAULT_FETCH_LATENCY: Duration = Duration::from_millis(1000);
pub const DEFAULT_FAILURE_RATE: f64 = 0.3;

const BUNDLED_DATASET: &str = include_str!("../data/mock_diagnosis.json");

#[async_trait]
pub trait DiagnosisSource: Send + Sync {
    async fn fetch_diagnoses(&self) -> Result<Vec<DiagnosisRecord>, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dataset {
    Bundled,
    File(PathBuf),
    Inline(String),
}

#[derive(Debug, Clone)]
pub struct MockServiceConfig {
    pub latency: Duration,
    pub failure_rate: f64,
    pub seed: Option<u64>,
    pub dataset: Dataset,
}

impl Default for MockServiceConfig {
    fn default() -> Self {
        Self {
            latency: DEFAULT_FETCH_LATENCY,
            failure_rate: DEFAULT_FAILURE_RATE,
            seed: None,
            dataset: Dataset::Bundled,
        }
    }
}

/// Simulated backend: waits out a fixed latency, fails with a configurable
/// probability, otherwise decodes the dataset.
pub struct MockDiagnosisService {
    latency: Duration,
    failure_rate: f64,
    dataset: Dataset,
    rng: Mutex<StdRng>,
}

impl MockDiagnosisService {
    pub fn new(config: MockServiceConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            latency: config.latency,
            failure_rate: clamp_failure_rate(config.failure_rate),
            dataset: config.dataset,
            rng: Mutex::new(rng),
        }
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    async fn load_dataset(&self) -> Result<Vec<DiagnosisRecord>, FetchError> {
        let raw = match &self.dataset {
            Dataset::Bundled => BUNDLED_DATASET.to_string(),
            Dataset::Inline(raw) => raw.clone(),
            Dataset::File(path) => tokio::fs::read_to_string(path).await.map_err(|err| {
                FetchError::decoding(format!("failed to read '{}': {err}", path.display()))
            })?,
        };
        Ok(serde_json::from_str(&raw)?)
    }
}

impl Default for MockDiagnosisService {
    fn default() -> Self {
        Self::new(MockServiceConfig::default())
    }
}

#[async_trait]
impl DiagnosisSource for MockDiagnosisService {
    async fn fetch_diagnoses(&self) -> Result<Vec<DiagnosisRecord>, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let failed = self.rng.lock().await.random_bool(self.failure_rate);
        if failed {
            debug!(failure_rate = self.failure_rate, "simulated server failure");
            return Err(FetchError::ServerError);
        }

        self.load_dataset().await
    }
}

/// Maps any value into the probability range; NaN counts as never failing.
pub fn clamp_failure_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        return 0.0;
    }
    rate.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;

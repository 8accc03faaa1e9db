use std::{fs, path::Path, path::PathBuf, time::Duration};

use diagnosis_core::{
    source::{clamp_failure_rate, DEFAULT_FAILURE_RATE, DEFAULT_FETCH_LATENCY},
    Dataset, MockServiceConfig,
};
use serde::Deserialize;
use shared::domain::Locale;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "diagnosis.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub fetch_latency_ms: u64,
    pub failure_rate: f64,
    pub rng_seed: Option<u64>,
    pub dataset_path: Option<PathBuf>,
    pub locale: Locale,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fetch_latency_ms: DEFAULT_FETCH_LATENCY.as_millis() as u64,
            failure_rate: DEFAULT_FAILURE_RATE,
            rng_seed: None,
            dataset_path: None,
            locale: Locale::default(),
        }
    }
}

impl Settings {
    pub fn service_config(&self) -> MockServiceConfig {
        MockServiceConfig {
            latency: Duration::from_millis(self.fetch_latency_ms),
            failure_rate: self.failure_rate,
            seed: self.rng_seed,
            dataset: match &self.dataset_path {
                Some(path) => Dataset::File(path.clone()),
                None => Dataset::Bundled,
            },
        }
    }

    pub fn set_failure_rate(&mut self, rate: f64) {
        let clamped = clamp_failure_rate(rate);
        if clamped != rate {
            warn!(requested = rate, applied = clamped, "failure rate clamped");
        }
        self.failure_rate = clamped;
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    fetch_latency_ms: Option<u64>,
    failure_rate: Option<f64>,
    rng_seed: Option<u64>,
    dataset_path: Option<PathBuf>,
    locale: Option<String>,
}

pub fn load_settings(config_path: &Path) -> Settings {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file if present, then `APP__*` variables.
/// Values that fail to parse are skipped with a warning.
pub fn load_settings_with(config_path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, file_cfg),
            Err(err) => warn!(path = %config_path.display(), error = %err, "ignoring unreadable config file"),
        }
    }

    if let Some(v) = env("APP__FETCH_LATENCY_MS") {
        match v.trim().parse::<u64>() {
            Ok(ms) => settings.fetch_latency_ms = ms,
            Err(_) => warn!(value = %v, "ignoring invalid APP__FETCH_LATENCY_MS"),
        }
    }
    if let Some(v) = env("APP__FAILURE_RATE") {
        match v.trim().parse::<f64>() {
            Ok(rate) => settings.set_failure_rate(rate),
            Err(_) => warn!(value = %v, "ignoring invalid APP__FAILURE_RATE"),
        }
    }
    if let Some(v) = env("APP__RNG_SEED") {
        match v.trim().parse::<u64>() {
            Ok(seed) => settings.rng_seed = Some(seed),
            Err(_) => warn!(value = %v, "ignoring invalid APP__RNG_SEED"),
        }
    }
    if let Some(v) = env("APP__DATASET_PATH") {
        if !v.trim().is_empty() {
            settings.dataset_path = Some(PathBuf::from(v.trim()));
        }
    }
    if let Some(v) = env("APP__LOCALE") {
        apply_locale(&mut settings, &v);
    }

    settings
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(ms) = file_cfg.fetch_latency_ms {
        settings.fetch_latency_ms = ms;
    }
    if let Some(rate) = file_cfg.failure_rate {
        settings.set_failure_rate(rate);
    }
    if let Some(seed) = file_cfg.rng_seed {
        settings.rng_seed = Some(seed);
    }
    if let Some(path) = file_cfg.dataset_path {
        settings.dataset_path = Some(path);
    }
    if let Some(code) = file_cfg.locale {
        apply_locale(settings, &code);
    }
}

fn apply_locale(settings: &mut Settings, code: &str) {
    match code.parse::<Locale>() {
        Ok(locale) => settings.locale = locale,
        Err(err) => warn!(error = %err, "keeping locale {}", settings.locale),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

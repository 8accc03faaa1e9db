use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

fn temp_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("diagnosis_cli_config_{suffix}.toml"));
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn missing_file_and_empty_env_yield_defaults() {
    let settings = load_settings_with(Path::new("./does-not-exist.toml"), env_from(&[]));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.fetch_latency_ms, 1000);
    assert_eq!(settings.failure_rate, 0.3);
    assert_eq!(settings.locale, Locale::English);
}

#[test]
fn env_overrides_file_values() {
    let path = temp_config(
        r#"
fetch_latency_ms = 250
failure_rate = 0.1
rng_seed = 9
locale = "ko"
"#,
    );

    let settings = load_settings_with(
        &path,
        env_from(&[("APP__FAILURE_RATE", "0.75"), ("APP__RNG_SEED", "11")]),
    );

    assert_eq!(settings.fetch_latency_ms, 250);
    assert_eq!(settings.failure_rate, 0.75);
    assert_eq!(settings.rng_seed, Some(11));
    assert_eq!(settings.locale, Locale::Korean);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn invalid_values_are_ignored() {
    let settings = load_settings_with(
        Path::new("./does-not-exist.toml"),
        env_from(&[
            ("APP__FETCH_LATENCY_MS", "soon"),
            ("APP__RNG_SEED", "-3"),
            ("APP__LOCALE", "fr"),
        ]),
    );

    assert_eq!(settings.fetch_latency_ms, 1000);
    assert_eq!(settings.rng_seed, None);
    assert_eq!(settings.locale, Locale::English);
}

#[test]
fn unparsable_file_falls_back_to_defaults() {
    let path = temp_config("fetch_latency_ms = \"fast\"");
    let settings = load_settings_with(&path, env_from(&[]));
    assert_eq!(settings, Settings::default());
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn failure_rate_is_clamped() {
    let settings = load_settings_with(
        Path::new("./does-not-exist.toml"),
        env_from(&[("APP__FAILURE_RATE", "3.5")]),
    );
    assert_eq!(settings.failure_rate, 1.0);
}

#[test]
fn service_config_uses_dataset_path_when_set() {
    let settings = load_settings_with(
        Path::new("./does-not-exist.toml"),
        env_from(&[("APP__DATASET_PATH", "/tmp/records.json"), ("APP__FETCH_LATENCY_MS", "0")]),
    );

    let config = settings.service_config();
    assert_eq!(config.dataset, Dataset::File(PathBuf::from("/tmp/records.json")));
    assert_eq!(config.latency, Duration::ZERO);
}

use super::*;
use shared::domain::DiagnosisType;

fn instant_config(failure_rate: f64) -> MockServiceConfig {
    MockServiceConfig {
        latency: Duration::ZERO,
        failure_rate,
        seed: Some(7),
        dataset: Dataset::Bundled,
    }
}

#[tokio::test]
async fn never_failing_service_returns_bundled_dataset_in_order() {
    let service = MockDiagnosisService::new(instant_config(0.0));

    let records = service.fetch_diagnoses().await.expect("fetch");
    assert_eq!(records.len(), 8);
    assert_eq!(records[0].id.as_str(), "DX-1001");
    assert_eq!(records[7].id.as_str(), "DX-1008");
    let basic = records
        .iter()
        .filter(|r| r.diagnosis_type == DiagnosisType::Basic)
        .count();
    assert_eq!(basic, 4);
}

#[tokio::test]
async fn always_failing_service_returns_server_error() {
    let service = MockDiagnosisService::new(instant_config(1.0));
    for _ in 0..5 {
        assert_eq!(
            service.fetch_diagnoses().await.expect_err("must fail"),
            FetchError::ServerError
        );
    }
}

#[tokio::test]
async fn malformed_dataset_returns_decoding_error() {
    let service = MockDiagnosisService::new(MockServiceConfig {
        dataset: Dataset::Inline(r#"[{"id": "broken"}]"#.to_string()),
        ..instant_config(0.0)
    });

    let err = service.fetch_diagnoses().await.expect_err("must fail");
    assert!(matches!(err, FetchError::DecodingError(_)), "unexpected: {err:?}");
    assert!(!err.is_transient());
}

#[tokio::test]
async fn missing_dataset_file_returns_decoding_error() {
    let path = std::env::temp_dir().join("diagnosis_core_missing_dataset_does_not_exist.json");
    let service = MockDiagnosisService::new(MockServiceConfig {
        dataset: Dataset::File(path),
        ..instant_config(0.0)
    });

    let err = service.fetch_diagnoses().await.expect_err("must fail");
    match err {
        FetchError::DecodingError(reason) => assert!(reason.contains("failed to read")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn same_seed_reproduces_outcome_sequence() {
    let config = MockServiceConfig {
        seed: Some(42),
        ..instant_config(0.5)
    };
    let first = MockDiagnosisService::new(config.clone());
    let second = MockDiagnosisService::new(config);

    let mut first_outcomes = Vec::new();
    let mut second_outcomes = Vec::new();
    for _ in 0..32 {
        first_outcomes.push(first.fetch_diagnoses().await.is_ok());
        second_outcomes.push(second.fetch_diagnoses().await.is_ok());
    }

    assert_eq!(first_outcomes, second_outcomes);
    assert!(first_outcomes.contains(&true));
    assert!(first_outcomes.contains(&false));
}

#[tokio::test(start_paused = true)]
async fn fetch_waits_out_configured_latency() {
    let service = MockDiagnosisService::new(MockServiceConfig {
        latency: Duration::from_millis(1000),
        ..instant_config(0.0)
    });

    let started = tokio::time::Instant::now();
    service.fetch_diagnoses().await.expect("fetch");
    assert!(started.elapsed() >= Duration::from_millis(1000));
}

#[test]
fn failure_rate_is_clamped_into_probability_range() {
    assert_eq!(clamp_failure_rate(-0.5), 0.0);
    assert_eq!(clamp_failure_rate(1.5), 1.0);
    assert_eq!(clamp_failure_rate(f64::NAN), 0.0);
    assert_eq!(clamp_failure_rate(0.3), 0.3);

    let service = MockDiagnosisService::new(instant_config(4.0));
    assert_eq!(service.failure_rate(), 1.0);
}

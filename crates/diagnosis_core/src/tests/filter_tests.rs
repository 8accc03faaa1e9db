use super::*;
use shared::domain::{DiagnosisStatus, DiagnosisType, RecordId};

fn record(id: &str, diagnosis_type: DiagnosisType) -> DiagnosisRecord {
    DiagnosisRecord {
        id: RecordId(id.to_string()),
        vehicle_name: format!("vehicle-{id}"),
        license_plate: format!("plate-{id}"),
        date: "2025.12.15".to_string(),
        status: DiagnosisStatus::Completed,
        diagnosis_type,
    }
}

fn mixed() -> Vec<DiagnosisRecord> {
    vec![
        record("a", DiagnosisType::Premium),
        record("b", DiagnosisType::Basic),
        record("c", DiagnosisType::Basic),
        record("d", DiagnosisType::Premium),
        record("e", DiagnosisType::Basic),
    ]
}

fn ids(records: &[DiagnosisRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn all_is_identity() {
    let records = mixed();
    assert_eq!(filter_records(&records, FilterSelection::All), records);
}

#[test]
fn type_filters_keep_matching_records_in_order() {
    let records = mixed();
    assert_eq!(
        ids(&filter_records(&records, FilterSelection::Basic)),
        vec!["b", "c", "e"]
    );
    assert_eq!(
        ids(&filter_records(&records, FilterSelection::Premium)),
        vec!["a", "d"]
    );
}

#[test]
fn filtering_is_idempotent() {
    let records = mixed();
    for selection in FilterSelection::ALL {
        let once = filter_records(&records, selection);
        assert_eq!(filter_records(&once, selection), once);
    }
}

#[test]
fn filtering_empty_list_yields_empty_list() {
    for selection in FilterSelection::ALL {
        assert!(filter_records(&[], selection).is_empty());
    }
}

#[test]
fn state_defaults_to_all_and_collapses_raw_indices() {
    let mut state = FilterState::default();
    assert_eq!(state.current(), FilterSelection::All);

    assert_eq!(state.select_raw(2), FilterSelection::Premium);
    assert_eq!(state.apply(&mixed()).len(), 2);

    assert_eq!(state.select_raw(7), FilterSelection::All);
    assert_eq!(state.apply(&mixed()).len(), 5);

    state.select(FilterSelection::Basic);
    assert_eq!(state.current(), FilterSelection::Basic);
}

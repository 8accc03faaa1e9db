use shared::domain::{DiagnosisRecord, FilterSelection};

/// Latest filter chosen by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterState {
    current: FilterSelection,
}

impl FilterState {
    pub fn current(&self) -> FilterSelection {
        self.current
    }

    pub fn select(&mut self, selection: FilterSelection) {
        self.current = selection;
    }

    pub fn select_raw(&mut self, index: i64) -> FilterSelection {
        self.current = FilterSelection::from_index(index);
        self.current
    }

    pub fn apply(&self, records: &[DiagnosisRecord]) -> Vec<DiagnosisRecord> {
        filter_records(records, self.current)
    }
}

/// Keeps the records matching `selection`, in their original order.
pub fn filter_records(records: &[DiagnosisRecord], selection: FilterSelection) -> Vec<DiagnosisRecord> {
    match selection.diagnosis_type() {
        None => records.to_vec(),
        Some(kind) => records
            .iter()
            .filter(|record| record.diagnosis_type == kind)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;

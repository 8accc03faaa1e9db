//! Reactive core behind the diagnosis list screen: merges view activation,
//! filter selection and locale toggles into one consistent rendered output.

pub mod coordinator;
pub mod filter;
pub mod locale;
pub mod source;
pub mod strings;

pub use coordinator::{
    CoordinatorEvent, HomeCoordinator, Input, ListView, Output, Rendered, Triggers,
};
pub use filter::{filter_records, FilterState};
pub use locale::LocaleStore;
pub use source::{Dataset, DiagnosisSource, MockDiagnosisService, MockServiceConfig};
pub use strings::{BundledStrings, StringArg, StringResolver};

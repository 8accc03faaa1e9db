use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::UnknownLocale;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(RecordId);

/// Display locale. Exactly two values exist; `English` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ko")]
    Korean,
}

impl Locale {
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Korean => "ko",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::English => Self::Korean,
            Self::Korean => Self::English,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::English),
            "ko" => Ok(Self::Korean),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosisStatus {
    Preparing,
    Analyzing,
    ActionNeeded,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosisType {
    Basic,
    Premium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisRecord {
    pub id: RecordId,
    pub vehicle_name: String,
    pub license_plate: String,
    pub date: String,
    pub status: DiagnosisStatus,
    #[serde(rename = "type")]
    pub diagnosis_type: DiagnosisType,
}

/// Category filter chosen in the list header.
///
/// Raw segment indices and serialized names outside the known set decode
/// to `All`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSelection {
    #[default]
    All,
    Basic,
    Premium,
}

impl FilterSelection {
    pub const ALL: [Self; 3] = [Self::All, Self::Basic, Self::Premium];

    pub fn from_index(index: i64) -> Self {
        match index {
            1 => Self::Basic,
            2 => Self::Premium,
            _ => Self::All,
        }
    }

    pub const fn index(self) -> i64 {
        match self {
            Self::All => 0,
            Self::Basic => 1,
            Self::Premium => 2,
        }
    }

    /// The record type this selection keeps, or `None` for no filtering.
    pub const fn diagnosis_type(self) -> Option<DiagnosisType> {
        match self {
            Self::All => None,
            Self::Basic => Some(DiagnosisType::Basic),
            Self::Premium => Some(DiagnosisType::Premium),
        }
    }

    pub const fn label_key(self) -> &'static str {
        match self {
            Self::All => "filter_all",
            Self::Basic => "filter_basic",
            Self::Premium => "filter_premium",
        }
    }
}

impl From<i64> for FilterSelection {
    fn from(index: i64) -> Self {
        Self::from_index(index)
    }
}

impl<'de> Deserialize<'de> for FilterSelection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Index(i64),
            Name(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Index(index) => Self::from_index(index),
            Raw::Name(name) => match name.to_ascii_lowercase().as_str() {
                "basic" => Self::Basic,
                "premium" => Self::Premium,
                _ => Self::All,
            },
        })
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;

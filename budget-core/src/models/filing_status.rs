use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedJointly,
}

impl FilingStatus {
    pub fn all() -> &'static [FilingStatus] {
        &[FilingStatus::Single, FilingStatus::MarriedJointly]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedJointly => "married_jointly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "married_jointly" => Some(Self::MarriedJointly),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedJointly => "Married Filing Jointly",
        }
    }
}

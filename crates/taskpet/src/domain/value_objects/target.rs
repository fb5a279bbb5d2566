//! Habit target metadata - unit and period

use serde::{Deserialize, Serialize};

/// Unit label for a habit's target quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetUnit {
    Times,
    Km,
    Minutes,
}

impl TargetUnit {
    pub fn as_i16(self) -> i16 {
        match self {
            TargetUnit::Times => 0,
            TargetUnit::Km => 1,
            TargetUnit::Minutes => 2,
        }
    }
}

impl TryFrom<i16> for TargetUnit {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TargetUnit::Times),
            1 => Ok(TargetUnit::Km),
            2 => Ok(TargetUnit::Minutes),
            other => Err(format!("Unknown target unit: {}", other)),
        }
    }
}

impl std::fmt::Display for TargetUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetUnit::Times => write!(f, "times"),
            TargetUnit::Km => write!(f, "km"),
            TargetUnit::Minutes => write!(f, "minutes"),
        }
    }
}

/// Period over which a habit's target applies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl TargetPeriod {
    pub fn as_i16(self) -> i16 {
        match self {
            TargetPeriod::Daily => 0,
            TargetPeriod::Weekly => 1,
            TargetPeriod::Monthly => 2,
        }
    }
}

impl TryFrom<i16> for TargetPeriod {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TargetPeriod::Daily),
            1 => Ok(TargetPeriod::Weekly),
            2 => Ok(TargetPeriod::Monthly),
            other => Err(format!("Unknown target period: {}", other)),
        }
    }
}

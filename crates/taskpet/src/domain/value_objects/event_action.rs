//! EventAction - what a ledger entry records

use serde::{Deserialize, Serialize};

/// Action recorded by a task event. `delta` conventions:
/// created 0, completed +1, reopened -1, logged 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Created,
    Completed,
    Reopened,
    Logged,
}

impl EventAction {
    pub fn as_i16(self) -> i16 {
        match self {
            EventAction::Created => 0,
            EventAction::Completed => 1,
            EventAction::Reopened => 2,
            EventAction::Logged => 3,
        }
    }
}

impl TryFrom<i16> for EventAction {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventAction::Created),
            1 => Ok(EventAction::Completed),
            2 => Ok(EventAction::Reopened),
            3 => Ok(EventAction::Logged),
            other => Err(format!("Unknown event action: {}", other)),
        }
    }
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Created => write!(f, "created"),
            EventAction::Completed => write!(f, "completed"),
            EventAction::Reopened => write!(f, "reopened"),
            EventAction::Logged => write!(f, "logged"),
        }
    }
}

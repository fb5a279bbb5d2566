//! TaskKind, TaskStatus, TrackingMode - task classification

use serde::{Deserialize, Serialize};

/// A task is either a one-off todo or a recurring habit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    #[default]
    Todo,
    Habit,
}

impl TaskKind {
    pub fn as_i16(self) -> i16 {
        match self {
            TaskKind::Todo => 0,
            TaskKind::Habit => 1,
        }
    }
}

impl TryFrom<i16> for TaskKind {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TaskKind::Todo),
            1 => Ok(TaskKind::Habit),
            other => Err(format!("Unknown task kind: {}", other)),
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::Todo => write!(f, "todo"),
            TaskKind::Habit => write!(f, "habit"),
        }
    }
}

/// Task lifecycle state. `Archived` is terminal and never produced by
/// the completion ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Open,
    Done,
    Archived,
}

impl TaskStatus {
    pub fn as_i16(self) -> i16 {
        match self {
            TaskStatus::Open => 0,
            TaskStatus::Done => 1,
            TaskStatus::Archived => 2,
        }
    }
}

impl TryFrom<i16> for TaskStatus {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TaskStatus::Open),
            1 => Ok(TaskStatus::Done),
            2 => Ok(TaskStatus::Archived),
            other => Err(format!("Unknown task status: {}", other)),
        }
    }
}

/// Habit sub-type: binary done/undone checkbox vs cumulative quantity log.
/// Required for habits, absent for todos.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMode {
    Checkbox,
    Log,
}

impl TrackingMode {
    pub fn as_i16(self) -> i16 {
        match self {
            TrackingMode::Checkbox => 0,
            TrackingMode::Log => 1,
        }
    }
}

impl TryFrom<i16> for TrackingMode {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TrackingMode::Checkbox),
            1 => Ok(TrackingMode::Log),
            other => Err(format!("Unknown tracking mode: {}", other)),
        }
    }
}

//! Stage and LifeState - a pet's life phase and liveness

use serde::{Deserialize, Serialize};

/// Life phase of a pet. Transitions only move forward; a reset creates
/// a fresh character instead of reverse-evolving.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Egg,
    Child,
    Adult,
}

impl Stage {
    pub fn as_i16(self) -> i16 {
        match self {
            Stage::Egg => 0,
            Stage::Child => 1,
            Stage::Adult => 2,
        }
    }
}

impl TryFrom<i16> for Stage {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Stage::Egg),
            1 => Ok(Stage::Child),
            2 => Ok(Stage::Adult),
            other => Err(format!("Unknown stage: {}", other)),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Egg => write!(f, "egg"),
            Stage::Child => write!(f, "child"),
            Stage::Adult => write!(f, "adult"),
        }
    }
}

/// Whether a pet is alive or dead (soft state, never hard-deleted).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifeState {
    #[default]
    Alive,
    Dead,
}

impl LifeState {
    pub fn as_i16(self) -> i16 {
        match self {
            LifeState::Alive => 0,
            LifeState::Dead => 1,
        }
    }
}

impl TryFrom<i16> for LifeState {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LifeState::Alive),
            1 => Ok(LifeState::Dead),
            other => Err(format!("Unknown life state: {}", other)),
        }
    }
}

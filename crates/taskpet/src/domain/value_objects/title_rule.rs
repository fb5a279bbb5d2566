//! TitleRule - achievement rule classification

use serde::{Deserialize, Serialize};

/// How a title's threshold is evaluated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TitleRule {
    /// Threshold against the count of completed todos.
    TodoCompletion,
    /// Threshold against the count of completed habits.
    HabitCompletion,
    /// Threshold against the active pet's level.
    PetLevel,
}

impl std::fmt::Display for TitleRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TitleRule::TodoCompletion => write!(f, "todo_completion"),
            TitleRule::HabitCompletion => write!(f, "habit_completion"),
            TitleRule::PetLevel => write!(f, "pet_level"),
        }
    }
}

impl std::str::FromStr for TitleRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo_completion" => Ok(TitleRule::TodoCompletion),
            "habit_completion" => Ok(TitleRule::HabitCompletion),
            "pet_level" => Ok(TitleRule::PetLevel),
            other => Err(format!("Unknown rule type: {}", other)),
        }
    }
}

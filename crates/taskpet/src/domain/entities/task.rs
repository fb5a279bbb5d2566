//! Task - a todo or habit owned by a user
//!
//! The experience reward is derived from the difficulty and recomputed
//! whenever the difficulty changes; habits additionally carry a tracking
//! mode and optional target metadata.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{
    Difficulty, TargetPeriod, TargetUnit, TaskKind, TaskStatus, TrackingMode,
};

pub const TITLE_MAX_LEN: usize = 255;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub kind: TaskKind,
    pub status: TaskStatus,
    pub tracking_mode: Option<TrackingMode>,
    pub difficulty: Difficulty,
    pub reward_exp: i32,
    pub reward_food_count: i32,
    pub target_value: Option<f64>,
    pub target_unit: Option<TargetUnit>,
    pub target_period: Option<TargetPeriod>,
    pub due_on: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub tag: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create an open task with the reward derived from the difficulty.
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        kind: TaskKind,
        tracking_mode: Option<TrackingMode>,
        difficulty: Difficulty,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            kind,
            status: TaskStatus::Open,
            tracking_mode,
            difficulty,
            reward_exp: difficulty.reward_exp(),
            reward_food_count: 1,
            target_value: None,
            target_unit: None,
            target_period: None,
            due_on: None,
            completed_at: None,
            tag: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_todo(&self) -> bool {
        self.kind == TaskKind::Todo
    }

    pub fn is_habit(&self) -> bool {
        self.kind == TaskKind::Habit
    }

    pub fn is_open(&self) -> bool {
        self.status == TaskStatus::Open
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Habit tracked by cumulative quantity entries rather than a checkbox.
    pub fn is_log_habit(&self) -> bool {
        self.is_habit() && self.tracking_mode == Some(TrackingMode::Log)
    }

    /// Eligible for the `complete`/`reopen` ledger path: todos and
    /// checkbox habits. Log habits must use `log` instead.
    pub fn is_completable(&self) -> bool {
        !self.is_log_habit()
    }

    /// Change the difficulty and recompute the experience reward.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.difficulty != difficulty {
            self.difficulty = difficulty;
            self.reward_exp = difficulty.reward_exp();
            self.updated_at = Utc::now();
        }
    }

    /// Field-level validation, applied before any persistence.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("title must be present".into()));
        }
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "title must be at most {} characters",
                TITLE_MAX_LEN
            )));
        }
        if self.reward_exp < 0 {
            return Err(DomainError::Validation("reward_exp must be >= 0".into()));
        }
        if self.reward_food_count < 0 {
            return Err(DomainError::Validation(
                "reward_food_count must be >= 0".into(),
            ));
        }
        match (self.kind, self.tracking_mode) {
            (TaskKind::Habit, None) => Err(DomainError::Validation(
                "tracking_mode is required for habits".into(),
            )),
            (TaskKind::Todo, Some(_)) => Err(DomainError::Validation(
                "tracking_mode is only allowed for habits".into(),
            )),
            _ => Ok(()),
        }
    }
}

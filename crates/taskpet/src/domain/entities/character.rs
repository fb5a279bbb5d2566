//! Character - a user's pet, the recipient of all progression rewards
//!
//! Pure domain entity; mutation methods compute the next state and leave
//! persistence (and its locking) to the adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::CharacterKind;
use crate::domain::services::growth::GrowthSnapshot;
use crate::domain::services::progression::{self, FeedConfig, EVOLVE_LEVEL, HATCH_LEVEL};
use crate::domain::value_objects::{LifeState, Stage};

/// A pet. One per lineage slot; a user has many historical characters
/// but at most one active one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind_id: Uuid,
    pub level: i32,
    pub exp: i64,
    pub bond: i32,
    pub bond_max: i32,
    pub stage: Stage,
    pub life_state: LifeState,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub dead_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of attempting to feed. Resource shortfalls are outcomes,
/// not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// Bond increased; the caller must also debit `food_cost` from the user.
    Fed { food_cost: i32 },
    BondFull,
    NotEnoughFood,
}

/// Stage transitions owed after an experience gain. The caller resolves
/// them by looking up the target kind and calling `hatch_into` /
/// `evolve_into`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthNeeds {
    pub hatch_due: bool,
    pub evolve_due: bool,
}

impl Character {
    /// Create a fresh egg for a user.
    pub fn new_egg(user_id: Uuid, egg_kind: &CharacterKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind_id: egg_kind.id,
            level: 1,
            exp: 0,
            bond: 0,
            bond_max: 100,
            stage: Stage::Egg,
            life_state: LifeState::Alive,
            last_activity_at: None,
            dead_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life_state == LifeState::Alive
    }

    /// Cumulative experience that was required to reach the current level.
    pub fn exp_floor(&self) -> i64 {
        progression::exp_floor(self.level)
    }

    /// Cumulative experience required for the next level.
    pub fn exp_ceiling(&self) -> i64 {
        progression::exp_ceiling(self.level)
    }

    /// Experience earned within the current level.
    pub fn current_level_exp(&self) -> i64 {
        self.exp - self.exp_floor()
    }

    /// Experience still missing for the next level.
    pub fn exp_needed(&self) -> i64 {
        self.exp_ceiling() - self.exp
    }

    /// Experience gauge progress, 0..=100.
    pub fn exp_progress_percentage(&self) -> i32 {
        let span = (self.exp_ceiling() - self.exp_floor()) as f64;
        ((self.current_level_exp() as f64 / span) * 100.0).round() as i32
    }

    /// Bond gauge progress, 0..=100.
    pub fn bond_ratio(&self) -> i32 {
        ((self.bond as f64 / self.bond_max as f64) * 100.0).round() as i32
    }

    pub fn growth_snapshot(&self) -> GrowthSnapshot {
        GrowthSnapshot {
            level: self.level,
            stage: self.stage,
        }
    }

    /// Attempt a feed given the owner's current food count. On success the
    /// bond is raised (clamped to the max) and the activity timestamp is
    /// stamped; the food debit is returned for the caller to apply in the
    /// same transaction.
    pub fn try_feed(&mut self, food_count: i32, config: &FeedConfig, now: DateTime<Utc>) -> FeedOutcome {
        if self.bond >= self.bond_max {
            return FeedOutcome::BondFull;
        }
        if food_count <= config.min_food_to_feed {
            return FeedOutcome::NotEnoughFood;
        }

        self.bond = (self.bond + config.bond_gain).min(self.bond_max);
        self.last_activity_at = Some(now);
        self.updated_at = now;
        FeedOutcome::Fed {
            food_cost: config.food_cost,
        }
    }

    /// Add experience and cascade level-ups. Returns which stage
    /// transitions are now due; the kind reassignment itself needs a
    /// kind lookup and is done by the caller. No-op for amount <= 0.
    pub fn apply_exp_gain(&mut self, amount: i64, now: DateTime<Utc>) -> GrowthNeeds {
        if amount <= 0 {
            return GrowthNeeds::default();
        }

        self.exp += amount;
        self.last_activity_at = Some(now);
        self.updated_at = now;

        while self.exp >= progression::exp_ceiling(self.level) {
            self.level += 1;
        }

        let hatch_due = self.stage == Stage::Egg && self.level >= HATCH_LEVEL;
        let stage_after_hatch = if hatch_due { Stage::Child } else { self.stage };
        let evolve_due = stage_after_hatch == Stage::Child && self.level >= EVOLVE_LEVEL;

        GrowthNeeds {
            hatch_due,
            evolve_due,
        }
    }

    /// Egg -> child. The kind is picked at random among child-stage kinds
    /// by the caller.
    pub fn hatch_into(&mut self, child_kind: &CharacterKind) {
        self.kind_id = child_kind.id;
        self.stage = Stage::Child;
    }

    /// Child -> adult, same asset line.
    pub fn evolve_into(&mut self, adult_kind: &CharacterKind) {
        self.kind_id = adult_kind.id;
        self.stage = Stage::Adult;
    }

    /// Subtract experience, floored at 0. Deliberately one-way: level and
    /// stage never move backwards, even when a completed task is reopened.
    pub fn decrease_exp(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        self.exp = (self.exp - amount).max(0);
    }

    /// Subtract bond, clamped at 0. Returns true when the character just
    /// starved: bond hit 0 while still alive.
    pub fn apply_bond_decay(&mut self, amount: i32) -> bool {
        self.bond = (self.bond - amount).max(0);
        self.bond == 0 && self.is_alive()
    }

    pub fn die(&mut self, now: DateTime<Utc>) {
        self.life_state = LifeState::Dead;
        self.dead_at = Some(now);
        self.updated_at = now;
    }
}

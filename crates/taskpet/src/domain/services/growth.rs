//! Growth Detector - classifies a completion by diffing pet snapshots
//!
//! A snapshot of (level, stage) is taken before a mutation and again after;
//! the diff tells the UI whether to show a hatch, an evolution, a plain
//! level-up banner, or nothing.

use serde::Serialize;

use crate::domain::services::progression::{EVOLVE_LEVEL, HATCH_LEVEL};
use crate::domain::value_objects::Stage;

/// Point-in-time view of a pet's progression state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthSnapshot {
    pub level: i32,
    pub stage: Stage,
}

/// Outcome of the diff. The three flags are mutually exclusive:
/// hatch and evolve require exact level transitions, any other level
/// increase falls through to `leveled_up`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GrowthFlags {
    pub hatched: bool,
    pub evolved: bool,
    pub leveled_up: bool,
}

impl GrowthFlags {
    pub fn none() -> Self {
        Self::default()
    }

    /// True when any banner-worthy change happened.
    pub fn any(&self) -> bool {
        self.hatched || self.evolved || self.leveled_up
    }
}

/// Diff two optional snapshots. Missing character (either side) means
/// no growth.
pub fn detect(before: Option<GrowthSnapshot>, after: Option<GrowthSnapshot>) -> GrowthFlags {
    let (before, after) = match (before, after) {
        (Some(b), Some(a)) => (b, a),
        _ => return GrowthFlags::none(),
    };

    let hatched = before.stage == Stage::Egg
        && after.stage == Stage::Child
        && before.level == HATCH_LEVEL - 1
        && after.level == HATCH_LEVEL;

    let evolved = before.stage == Stage::Child
        && after.stage == Stage::Adult
        && before.level == EVOLVE_LEVEL - 1
        && after.level == EVOLVE_LEVEL;

    let leveled_up = !hatched && !evolved && after.level > before.level;

    GrowthFlags {
        hatched,
        evolved,
        leveled_up,
    }
}

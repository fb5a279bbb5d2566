//! Domain Services
//!
//! Pure rule modules with no infrastructure dependencies.
//! - progression: experience curve, stage thresholds, decay/feed tuning
//! - growth: before/after snapshot diffing for hatch/evolve/level-up

pub mod growth;
pub mod progression;

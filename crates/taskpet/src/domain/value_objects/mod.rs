//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod difficulty;
mod event_action;
mod stage;
mod target;
mod task_kind;
mod title_rule;

pub use difficulty::*;
pub use event_action::*;
pub use stage::*;
pub use target::*;
pub use task_kind::*;
pub use title_rule::*;

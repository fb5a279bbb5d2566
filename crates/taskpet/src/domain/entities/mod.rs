//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Character: a user's pet, recipient of progression rewards
//! - CharacterKind: master template (asset line + stage)
//! - Task: todo or habit
//! - TaskEvent: append-only ledger entry
//! - Title / UserTitle: achievements and their unlock records
//! - User: owner, food balance, active-character pointer

mod character;
mod character_kind;
mod task;
mod task_event;
mod title;
mod user;

pub use character::*;
pub use character_kind::*;
pub use task::*;
pub use task_event::*;
pub use title::*;
pub use user::*;

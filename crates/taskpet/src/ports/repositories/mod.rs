//! Ports - Repository interfaces

mod character_kind_repository;
mod character_repository;
mod task_event_repository;
mod task_repository;
mod title_repository;
mod user_repository;

pub use character_kind_repository::*;
pub use character_repository::*;
pub use task_event_repository::*;
pub use task_repository::*;
pub use title_repository::*;
pub use user_repository::*;

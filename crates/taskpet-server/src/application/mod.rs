//! Application Services (Use Cases)

mod character_service;
mod completion_service;
mod task_service;
mod title_unlocker;

pub use character_service::CharacterService;
pub use completion_service::{CompletionResult, CompletionService};
pub use task_service::{NewTask, TaskPatch, TaskService};
pub use title_unlocker::TitleUnlocker;

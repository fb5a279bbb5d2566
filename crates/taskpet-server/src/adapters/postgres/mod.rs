//! PostgreSQL Repository Implementations

mod character_kind_repository;
mod character_repository;
mod progression_sql;
mod task_event_repository;
mod task_ledger;
mod task_repository;
mod title_repository;
mod user_repository;

pub use character_kind_repository::PgCharacterKindRepository;
pub use character_repository::PgCharacterRepository;
pub use task_event_repository::PgTaskEventRepository;
pub use task_ledger::PgTaskLedger;
pub use task_repository::PgTaskRepository;
pub use title_repository::PgTitleRepository;
pub use user_repository::PgUserRepository;

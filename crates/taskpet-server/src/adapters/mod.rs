//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod comment;
pub mod postgres;
pub mod push;

// Re-exports
pub use comment::OpenAiCommentGenerator;
pub use postgres::{
    PgCharacterKindRepository, PgCharacterRepository, PgTaskEventRepository, PgTaskLedger,
    PgTaskRepository, PgTitleRepository, PgUserRepository,
};
pub use push::LinePushNotifier;

//! Taskpet Domain Library
//!
//! Core domain types and interfaces for the taskpet progression engine:
//! a gamified task tracker where completing todos and habits feeds and
//! levels a virtual pet.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Character, Task, TaskEvent, Title, User)
//!   - `value_objects/`: Immutable value types (Stage, Difficulty, TaskKind, ...)
//!   - `services/`: Pure rule modules (progression curve, growth detection)
//!   - `errors`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `ledger`: The transactional task completion workflow
//!   - `services/`: External collaborator interfaces

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Character, CharacterKind, Difficulty, DomainError, EventAction, FeedOutcome, GrowthNeeds,
    LifeState, Stage, TargetPeriod, TargetUnit, Task, TaskEvent, TaskKind, TaskStatus, Title,
    TitleRule, TrackingMode, User, UserTitle,
};
pub use domain::services::growth::{self, GrowthFlags, GrowthSnapshot};
pub use domain::services::progression::{self, DecayConfig, FeedConfig};
pub use ports::{
    CharacterKindRepository,
    CharacterRepository,
    // Collaborator services
    CommentContext,
    CommentEvent,
    CommentGenerator,
    PushNotifier,
    // Repositories
    TaskEventRepository,
    // Ledger
    TaskLedger,
    TaskRepository,
    TitleRepository,
    UserRepository,
};

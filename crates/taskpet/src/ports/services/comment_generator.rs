//! Comment Generator Port
//!
//! Abstract interface for the pet reaction comments shown after a
//! completion. Implementations call an LLM; failures never propagate
//! into the completion outcome - the orchestrator degrades them to
//! "no comment".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Character, CharacterKind};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::Difficulty;

/// Event the comment reacts to. `LevelUp` takes priority over
/// `TaskCompleted` when both apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentEvent {
    TaskCompleted,
    LevelUp,
}

/// Context passed to the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentContext {
    pub task_title: String,
    pub difficulty: Difficulty,
}

#[async_trait]
pub trait CommentGenerator: Send + Sync {
    /// Generate a short in-character comment, or None when the
    /// generator declines (e.g. nothing to say).
    async fn generate(
        &self,
        event: CommentEvent,
        character: &Character,
        kind: &CharacterKind,
        context: &CommentContext,
    ) -> Result<Option<String>, DomainError>;
}

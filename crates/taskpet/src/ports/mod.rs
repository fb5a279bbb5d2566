//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the domain layer interacts with
//! external systems (repositories, the completion ledger, collaborator
//! services). Implementations live in the infrastructure layer.

pub mod ledger;
pub mod repositories;
pub mod services;

// Re-exports
pub use ledger::*;
pub use repositories::*;
pub use services::*;

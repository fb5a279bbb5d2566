//! Ports - Collaborator service interfaces

mod comment_generator;
mod push_notifier;

pub use comment_generator::*;
pub use push_notifier::*;

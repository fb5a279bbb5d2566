//! Push Notifier Port
//!
//! Fire-and-forget text push to a user's external messaging identity.
//! Delivery failures are logged by the implementation, not surfaced to
//! the engine.

use async_trait::async_trait;

use crate::domain::errors::DomainError;

#[async_trait]
pub trait PushNotifier: Send + Sync {
    async fn send(&self, messaging_id: &str, text: &str) -> Result<(), DomainError>;
}

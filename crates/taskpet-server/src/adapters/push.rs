//! Messaging Push Implementation
//!
//! Delivers reminder and alert texts through the LINE Messaging API
//! push endpoint using reqwest.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use taskpet::{DomainError, PushNotifier};

const PUSH_URL: &str = "https://api.line.me/v2/bot/message/push";

pub struct LinePushNotifier {
    client: Client,
    channel_token: String,
}

impl LinePushNotifier {
    pub fn new(channel_token: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            channel_token,
        }
    }
}

#[async_trait]
impl PushNotifier for LinePushNotifier {
    async fn send(&self, messaging_id: &str, text: &str) -> Result<(), DomainError> {
        let body = json!({
            "to": messaging_id,
            "messages": [{ "type": "text", "text": text }],
        });

        let response = self
            .client
            .post(PUSH_URL)
            .bearer_auth(&self.channel_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("push request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "push returned {status}: {detail}"
            )));
        }

        tracing::info!("push message delivered");
        Ok(())
    }
}

//! OpenAI Comment Generator Implementation
//!
//! Calls the chat completions API to produce a short in-character
//! reaction from the pet. Errors surface as `ExternalService`; the
//! completion orchestrator degrades them to "no comment".

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use taskpet::{
    Character, CharacterKind, CommentContext, CommentEvent, CommentGenerator, DomainError,
};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o";

pub struct OpenAiCommentGenerator {
    client: Client,
    api_key: String,
}

impl OpenAiCommentGenerator {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, api_key }
    }

    /// Personality per character art set; unknown sets get a neutral voice.
    fn tone_rules_for(asset_key: &str) -> &'static str {
        match asset_key {
            "egg" => "Still young and simple. Soft, gentle phrasing. Shows surprise and joy openly.",
            "green_robo" => "Mechanical but cheerful. Short, punchy sentences. Cheers head-on.",
            "hurozapple" => "Sweet and doting, like an apple sprite. Piles on the praise.",
            "dreamowl" => "Wise and calm like an owl. Warm, enveloping words. Quiet encouragement.",
            "lumya" => "Bright and nimble like a light spirit. Sparkling, upbeat energy.",
            "luna" => "Quiet and kind like a moon spirit. Soft, soothing word choices.",
            "frame" => "Fiery and passionate. Forceful phrasing. Pushes you forward with heat.",
            _ => "Encourages in a friendly, approachable voice.",
        }
    }

    fn system_prompt(character: &Character, kind: &CharacterKind) -> String {
        format!(
            "You are a pet named \"{}\".\n\
             Current state: {} (egg/child/adult), level: {}\n\
             Voice and personality: {}\n\n\
             Hard rules:\n\
             - At most 20 characters\n\
             - Stay in voice and character",
            kind.name,
            kind.stage,
            character.level,
            Self::tone_rules_for(&kind.asset_key),
        )
    }

    fn user_prompt(event: CommentEvent, character: &Character, context: &CommentContext) -> String {
        match event {
            CommentEvent::LevelUp => format!(
                "You just leveled up to level {}! Give a joyful comment.\n\
                 You must include your new level.\n\
                 Add a word about what you'll do next.",
                character.level
            ),
            CommentEvent::TaskCompleted => format!(
                "The user completed the task \"{}\" (difficulty: {}).\n\
                 Give an encouraging, supportive comment.",
                context.task_title, context.difficulty
            ),
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl CommentGenerator for OpenAiCommentGenerator {
    async fn generate(
        &self,
        event: CommentEvent,
        character: &Character,
        kind: &CharacterKind,
        context: &CommentContext,
    ) -> Result<Option<String>, DomainError> {
        let body = json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": Self::system_prompt(character, kind) },
                { "role": "user", "content": Self::user_prompt(event, character, context) },
            ],
            "max_tokens": 100,
            "temperature": 0.9,
        });

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "OpenAI returned {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("OpenAI response malformed: {e}")))?;

        let comment = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(comment)
    }
}

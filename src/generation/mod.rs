//! Text-generation stages: summaries, Markdown formatting, campaign digests.
//!
//! Every stage is one stateless chat-completions request: instruction,
//! historical context, and target text concatenated into a single user
//! message. No streaming, no conversation history, no retries.

use crate::config::GenerationSettings;
use crate::error::{Result, SagaError};
use crate::openai::create_generation_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Trait for single-prompt text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the first completion.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Chat-completions generator for OpenAI-compatible endpoints.
pub struct ChatGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl ChatGenerator {
    /// Create a generator from settings. Fails if the API key environment
    /// variable is missing, before any network call.
    pub fn from_settings(settings: &GenerationSettings) -> Result<Self> {
        let client = create_generation_client(&settings.api_base, &settings.api_key_env)?;
        Ok(Self {
            client,
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for ChatGenerator {
    #[instrument(skip_all, fields(model = %self.model, prompt_chars = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        info!("Sending generation request");

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| SagaError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| SagaError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SagaError::Api(format!("Chat completion failed: {}", e)))?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SagaError::Generation("Empty response from model".to_string()))?
            .clone();

        debug!("Received {} chars", text.len());
        Ok(text)
    }
}

/// Build the prompt for the summary stage.
pub fn summary_prompt(instruction: &str, context: &str, session: &str, transcript: &str) -> String {
    format!(
        "{}\n\nFor context, here are notes from recent sessions in chronological order:\n{}\n\nHere is the session transcript to summarize of session {}:\n{}",
        instruction, context, session, transcript
    )
}

/// Build the prompt for the Markdown formatting stage.
pub fn markdown_prompt(instruction: &str, context: &str, session: &str, summary: &str) -> String {
    format!(
        "{}\n\nFor context, here are notes from recent sessions in chronological order:\n{}\n\nHere is the session summary to format in Markdown of session {}:\n{}",
        instruction, context, session, summary
    )
}

/// Build the prompt for the whole-campaign summary.
pub fn campaign_prompt(instruction: &str, combined_notes: &str) -> String {
    format!("{}\n{}", instruction, combined_notes.trim())
}

/// Build the prompt for a custom question about one transcript.
pub fn ask_prompt(custom_prompt: &str, preamble: &str, transcript: &str) -> String {
    format!("{}\n\n{}\n{}", custom_prompt, preamble, transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_order() {
        let prompt = summary_prompt("Summarize.", "old notes", "session 12 audio", "the transcript");
        let instruction_pos = prompt.find("Summarize.").unwrap();
        let context_pos = prompt.find("old notes").unwrap();
        let transcript_pos = prompt.find("the transcript").unwrap();

        assert!(instruction_pos < context_pos);
        assert!(context_pos < transcript_pos);
        assert!(prompt.contains("session 12 audio"));
    }

    #[test]
    fn test_ask_prompt_places_question_first() {
        let prompt = ask_prompt("Who stole the gem?", "Answer from the transcript:", "DM: ...");
        assert!(prompt.starts_with("Who stole the gem?"));
        assert!(prompt.ends_with("DM: ..."));
    }

    #[test]
    fn test_campaign_prompt_trims_notes() {
        let prompt = campaign_prompt("Intro:", "\n\nnotes body\n\n");
        assert_eq!(prompt, "Intro:\nnotes body");
    }
}

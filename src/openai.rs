//! OpenAI-compatible client construction with sensible defaults.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

use crate::error::{Result, SagaError};

/// Default timeout for API requests (10 minutes).
///
/// Long sessions mean large uploads and slow reasoning models, so the
/// ceiling is generous.
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Create a client for the OpenAI transcription API.
///
/// Reads `OPENAI_API_KEY` from the environment, as the SDK does by default.
pub fn create_transcription_client() -> Client<OpenAIConfig> {
    Client::with_config(OpenAIConfig::default()).with_http_client(http_client())
}

/// Create a client for an OpenAI-compatible chat-completions endpoint.
///
/// The API key is read from the environment variable named by
/// `api_key_env`; a missing or empty key is a configuration error.
pub fn create_generation_client(api_base: &str, api_key_env: &str) -> Result<Client<OpenAIConfig>> {
    let api_key = match std::env::var(api_key_env) {
        Ok(key) if !key.is_empty() => key,
        _ => {
            return Err(SagaError::Config(format!(
                "{} is not set. Export it before running text generation.",
                api_key_env
            )))
        }
    };

    let config = OpenAIConfig::new()
        .with_api_base(api_base)
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client()))
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_client_requires_key() {
        let result = create_generation_client(
            "https://api.deepseek.com",
            "SAGA_TEST_KEY_THAT_DOES_NOT_EXIST",
        );
        assert!(result.is_err());
    }
}

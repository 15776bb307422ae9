//! OpenAI Whisper transcription implementation.

use super::{SessionTranscript, Transcriber};
use crate::audio::{chunk_audio, AudioChunk, ChunkOptions};
use crate::config::{AudioSettings, TranscriptionSettings};
use crate::error::{Result, SagaError};
use crate::openai::create_transcription_client;
use async_openai::types::{AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{debug, info, instrument};

/// OpenAI Whisper-based transcriber.
///
/// Splits oversized recordings into chunks before uploading; chunk files
/// live in a temp dir that is removed once transcription finishes.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    language: String,
    temperature: f32,
    chunk_options: ChunkOptions,
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber with default settings.
    pub fn new() -> Self {
        Self::from_settings(&TranscriptionSettings::default(), &AudioSettings::default())
    }

    pub fn from_settings(transcription: &TranscriptionSettings, audio: &AudioSettings) -> Self {
        Self {
            client: create_transcription_client(),
            model: transcription.model.clone(),
            language: transcription.language.clone(),
            temperature: transcription.temperature,
            chunk_options: ChunkOptions::from(audio),
        }
    }

    /// Transcribe a single chunk.
    #[instrument(skip(self, priming_prompt), fields(audio_path = %audio_path.display()))]
    async fn transcribe_single(&self, audio_path: &Path, priming_prompt: &str) -> Result<String> {
        debug!("Transcribing audio file");

        let file_bytes = tokio::fs::read(audio_path).await?;

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(async_openai::types::AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.mp3")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .language(&self.language)
            .temperature(self.temperature)
            .response_format(AudioResponseFormat::Json);

        if !priming_prompt.is_empty() {
            request_builder.prompt(priming_prompt);
        }

        let request = request_builder
            .build()
            .map_err(|e| SagaError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| SagaError::Api(format!("Whisper API error: {}", e)))?;

        Ok(response.text.trim().to_string())
    }

    /// Transcribe chunks one at a time, in time order.
    ///
    /// A single failure aborts the whole run; chunks already transcribed
    /// are discarded.
    async fn transcribe_chunks(
        &self,
        chunks: &[AudioChunk],
        priming_prompt: &str,
    ) -> Result<SessionTranscript> {
        let pb = if chunks.len() > 1 {
            let pb = ProgressBar::new(chunks.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  {spinner:.green} Whisper   [{bar:30.cyan/blue}] {pos}/{len}")
                    .unwrap()
                    .progress_chars("█▓░"),
            );
            Some(pb)
        } else {
            None
        };

        let mut texts = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let text = match self.transcribe_single(&chunk.path, priming_prompt).await {
                Ok(text) => text,
                Err(e) => {
                    if let Some(pb) = &pb {
                        pb.finish_and_clear();
                    }
                    return Err(SagaError::Transcription(format!(
                        "Chunk {} at {:.0}s failed: {}",
                        chunk.index + 1,
                        chunk.start_ms as f64 / 1000.0,
                        e
                    )));
                }
            };
            texts.push(text);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        Ok(SessionTranscript::new(texts))
    }
}

impl Default for WhisperTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(
        &self,
        audio_path: &Path,
        priming_prompt: &str,
    ) -> Result<SessionTranscript> {
        let temp_dir = tempfile::tempdir()?;
        let chunks = chunk_audio(audio_path, temp_dir.path(), &self.chunk_options).await?;

        info!("Transcribing {} chunk(s) with {}", chunks.len(), self.model);
        let transcript = self.transcribe_chunks(&chunks, priming_prompt).await?;

        // Chunk files are removed with the temp dir.
        drop(temp_dir);

        Ok(transcript)
    }
}

/// Check if the OpenAI API key is configured.
pub fn is_api_key_configured() -> bool {
    std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty())
}

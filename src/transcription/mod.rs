//! Transcription of session recordings.
//!
//! Chunks are transcribed one at a time, in time order, and their texts
//! joined back into a single transcript. The service call is the slow part;
//! there is nothing to overlap it with.

mod whisper;

pub use whisper::{is_api_key_configured, WhisperTranscriber};

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Transcript of one session, assembled from per-chunk texts in time order.
#[derive(Debug, Clone)]
pub struct SessionTranscript {
    chunks: Vec<String>,
}

impl SessionTranscript {
    pub fn new(chunks: Vec<String>) -> Self {
        Self { chunks }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk_texts(&self) -> &[String] {
        &self.chunks
    }

    /// The full transcript: chunk texts joined with a blank line.
    pub fn combined(&self) -> String {
        self.chunks.join("\n\n")
    }

    /// Per-chunk rendering with `=== Chunk N ===` labels.
    ///
    /// Kept alongside the combined transcript when a session was split, so
    /// a suspect passage can be traced back to the chunk that produced it.
    pub fn labeled_segments(&self) -> String {
        let mut out = String::new();
        for (i, text) in self.chunks.iter().enumerate() {
            out.push_str(&format!("=== Chunk {} ===\n\n", i + 1));
            out.push_str(text);
            out.push_str("\n\n");
        }
        out
    }
}

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a session recording, splitting it first if it exceeds
    /// the upload size ceiling.
    ///
    /// The priming prompt carries campaign vocabulary (proper nouns,
    /// jargon) the model would otherwise mangle.
    async fn transcribe(
        &self,
        audio_path: &Path,
        priming_prompt: &str,
    ) -> Result<SessionTranscript>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_is_blank_line_join() {
        let transcript = SessionTranscript::new(vec![
            "First chunk.".to_string(),
            "Second chunk.".to_string(),
            "Third chunk.".to_string(),
        ]);
        assert_eq!(
            transcript.combined(),
            "First chunk.\n\nSecond chunk.\n\nThird chunk."
        );
    }

    #[test]
    fn test_single_chunk_combined_is_verbatim() {
        let transcript = SessionTranscript::new(vec!["Only chunk.".to_string()]);
        assert_eq!(transcript.combined(), "Only chunk.");
    }

    #[test]
    fn test_labeled_segments_order() {
        let transcript =
            SessionTranscript::new(vec!["alpha".to_string(), "beta".to_string()]);
        let labeled = transcript.labeled_segments();

        let first = labeled.find("=== Chunk 1 ===").unwrap();
        let second = labeled.find("=== Chunk 2 ===").unwrap();
        assert!(first < second);
        assert!(labeled.contains("alpha"));
        assert!(labeled.contains("beta"));
    }
}

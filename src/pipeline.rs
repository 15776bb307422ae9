//! Recap pipeline driver.
//!
//! Sequences the full session-recap flow: aggregate historical notes,
//! transcribe the recording (chunking it first if oversized), summarize the
//! transcript, and format the summary as Markdown. Each stage's output is
//! an artifact on disk; a stage whose artifact already exists is skipped,
//! so an aborted run resumes where it left off.

use crate::artifacts::{self, ArtifactStore, FsArtifactStore};
use crate::config::{Prompts, Settings};
use crate::error::{Result, SagaError};
use crate::generation::{self, ChatGenerator, TextGenerator};
use crate::notes;
use crate::transcription::{Transcriber, WhisperTranscriber};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// Stage progression for a session.
///
/// Derived from artifact presence, so it also describes how far a previous
/// run got before aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NotStarted,
    Transcribed,
    Summarized,
    Formatted,
}

/// Determine how far a session has progressed from its stored artifacts.
pub fn resume_stage(store: &dyn ArtifactStore) -> Stage {
    if store.has(artifacts::MARKDOWN_SUMMARY) {
        Stage::Formatted
    } else if store.has(artifacts::SUMMARY) {
        Stage::Summarized
    } else if store.has(artifacts::TRANSCRIPT) {
        Stage::Transcribed
    } else {
        Stage::NotStarted
    }
}

/// Result of one pipeline run.
#[derive(Debug)]
pub struct RecapOutcome {
    /// Session id (the audio file stem).
    pub session: String,
    pub transcript_cached: bool,
    pub summary_cached: bool,
    pub markdown_cached: bool,
    /// Final artifact path.
    pub markdown_path: PathBuf,
}

/// The recap pipeline.
pub struct RecapPipeline {
    settings: Settings,
    prompts: Prompts,
    transcriber: Arc<dyn Transcriber>,
    generator: Arc<dyn TextGenerator>,
}

impl RecapPipeline {
    /// Create a pipeline with the default service clients.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;
        let transcriber: Arc<dyn Transcriber> = Arc::new(WhisperTranscriber::from_settings(
            &settings.transcription,
            &settings.audio,
        ));
        let generator: Arc<dyn TextGenerator> =
            Arc::new(ChatGenerator::from_settings(&settings.generation)?);

        Ok(Self {
            settings,
            prompts,
            transcriber,
            generator,
        })
    }

    /// Create a pipeline with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        transcriber: Arc<dyn Transcriber>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            settings,
            prompts,
            transcriber,
            generator,
        }
    }

    /// Run the full recap pipeline for one session recording.
    #[instrument(skip(self), fields(audio = %audio_path.display()))]
    pub async fn run(&self, audio_path: &Path) -> Result<RecapOutcome> {
        if !audio_path.exists() {
            return Err(SagaError::InvalidInput(format!(
                "Audio file not found: {}",
                audio_path.display()
            )));
        }

        let session = audio_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                SagaError::InvalidInput(format!("Invalid audio path: {}", audio_path.display()))
            })?
            .to_string();

        let store = FsArtifactStore::new(self.settings.sessions_dir().join(&session));

        match resume_stage(&store) {
            Stage::NotStarted => info!("Starting recap for session '{}'", session),
            stage => info!("Resuming session '{}' from {:?}", session, stage),
        }

        // Historical context from the most recent session notes. Rebuilt
        // from scratch every run; the combined document is also saved for
        // use outside the pipeline.
        let all_notes = notes::collect_session_notes(&self.settings.notes_dir())?;
        let context =
            notes::combine_recent_notes(&all_notes, self.settings.notes.context_sessions)?;
        std::fs::write(self.settings.combined_file_path(), &context)?;

        // Stage 1: transcript.
        let (transcript, transcript_cached) = match store.get(artifacts::TRANSCRIPT)? {
            Some(text) => {
                info!("Using cached transcript");
                (text, true)
            }
            None => (self.transcribe(audio_path, &store).await?, false),
        };

        // Stage 2: prose summary.
        let (summary, summary_cached) = match store.get(artifacts::SUMMARY)? {
            Some(text) => {
                info!("Using cached summary");
                (text, true)
            }
            None => {
                let prompt = generation::summary_prompt(
                    &self.prompts.generation.summary,
                    &context,
                    &session,
                    &transcript,
                );
                let summary = self.generator.complete(&prompt).await?;
                store.put(artifacts::SUMMARY, &summary)?;
                (summary, false)
            }
        };

        // Stage 3: Markdown formatting.
        let markdown_cached = match store.get(artifacts::MARKDOWN_SUMMARY)? {
            Some(_) => {
                info!("Using cached Markdown summary");
                true
            }
            None => {
                let prompt = generation::markdown_prompt(
                    &self.prompts.generation.markdown,
                    &context,
                    &session,
                    &summary,
                );
                let markdown = self.generator.complete(&prompt).await?;
                store.put(artifacts::MARKDOWN_SUMMARY, &markdown)?;
                false
            }
        };

        Ok(RecapOutcome {
            session,
            transcript_cached,
            summary_cached,
            markdown_cached,
            markdown_path: store.path_for(artifacts::MARKDOWN_SUMMARY),
        })
    }

    /// Transcribe the recording and persist the result.
    async fn transcribe(&self, audio_path: &Path, store: &FsArtifactStore) -> Result<String> {
        let transcript = self
            .transcriber
            .transcribe(audio_path, &self.prompts.transcription.priming)
            .await?;

        if transcript.chunk_count() > 1 {
            store.put(artifacts::TRANSCRIPT_SEGMENTS, &transcript.labeled_segments())?;
        }

        let combined = transcript.combined();
        store.put(artifacts::TRANSCRIPT, &combined)?;

        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::SessionTranscript;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockTranscriber {
        calls: AtomicUsize,
        chunks: Vec<String>,
    }

    impl MockTranscriber {
        fn new(chunks: Vec<&str>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                chunks: chunks.into_iter().map(String::from).collect(),
            }
        }
    }

    #[async_trait]
    impl Transcriber for MockTranscriber {
        async fn transcribe(
            &self,
            _audio_path: &Path,
            _priming_prompt: &str,
        ) -> Result<SessionTranscript> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SessionTranscript::new(self.chunks.clone()))
        }
    }

    struct MockGenerator;

    #[async_trait]
    impl TextGenerator for MockGenerator {
        async fn complete(&self, prompt: &str) -> Result<String> {
            Ok(format!("generated from {} chars", prompt.len()))
        }
    }

    struct FixtureDirs {
        _root: tempfile::TempDir,
        settings: Settings,
        audio_path: PathBuf,
    }

    fn fixture() -> FixtureDirs {
        let root = tempfile::tempdir().unwrap();

        let notes_dir = root.path().join("notes");
        std::fs::create_dir(&notes_dir).unwrap();
        std::fs::write(notes_dir.join("Session 1.md"), "The tavern.").unwrap();
        std::fs::write(notes_dir.join("Session 2.md"), "The heist.").unwrap();

        // The mock transcriber never opens the file; it only has to exist.
        let audio_path = root.path().join("session 3 audio.m4a");
        std::fs::write(&audio_path, b"not really audio").unwrap();

        let mut settings = Settings::default();
        settings.general.sessions_dir = root.path().join("sessions").display().to_string();
        settings.notes.notes_dir = notes_dir.display().to_string();
        settings.notes.combined_file = root.path().join("combined.md").display().to_string();

        FixtureDirs {
            _root: root,
            settings,
            audio_path,
        }
    }

    fn pipeline_with(
        fixture: &FixtureDirs,
        transcriber: Arc<MockTranscriber>,
    ) -> RecapPipeline {
        RecapPipeline::with_components(
            fixture.settings.clone(),
            Prompts::default(),
            transcriber,
            Arc::new(MockGenerator),
        )
    }

    #[tokio::test]
    async fn test_full_run_writes_all_artifacts() {
        let fx = fixture();
        let transcriber = Arc::new(MockTranscriber::new(vec!["part one", "part two"]));
        let pipeline = pipeline_with(&fx, transcriber.clone());

        let outcome = pipeline.run(&fx.audio_path).await.unwrap();

        assert_eq!(outcome.session, "session 3 audio");
        assert!(!outcome.transcript_cached);
        assert!(!outcome.summary_cached);
        assert!(!outcome.markdown_cached);

        let store =
            FsArtifactStore::new(fx.settings.sessions_dir().join("session 3 audio"));
        assert_eq!(
            store.get(artifacts::TRANSCRIPT).unwrap().as_deref(),
            Some("part one\n\npart two")
        );
        assert!(store.has(artifacts::TRANSCRIPT_SEGMENTS));
        assert!(store.has(artifacts::SUMMARY));
        assert!(store.has(artifacts::MARKDOWN_SUMMARY));
        assert_eq!(resume_stage(&store), Stage::Formatted);

        // The combined-context document was rebuilt.
        let combined = std::fs::read_to_string(fx.settings.combined_file_path()).unwrap();
        assert!(combined.contains("# Session 1"));
    }

    #[tokio::test]
    async fn test_cached_transcript_skips_transcription() {
        let fx = fixture();
        let store =
            FsArtifactStore::new(fx.settings.sessions_dir().join("session 3 audio"));
        store.put(artifacts::TRANSCRIPT, "cached transcript").unwrap();

        let transcriber = Arc::new(MockTranscriber::new(vec!["should not be used"]));
        let pipeline = pipeline_with(&fx, transcriber.clone());

        let outcome = pipeline.run(&fx.audio_path).await.unwrap();

        assert!(outcome.transcript_cached);
        assert_eq!(transcriber.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            store.get(artifacts::TRANSCRIPT).unwrap().as_deref(),
            Some("cached transcript")
        );
    }

    #[tokio::test]
    async fn test_single_chunk_session_writes_no_segments_file() {
        let fx = fixture();
        let transcriber = Arc::new(MockTranscriber::new(vec!["whole session"]));
        let pipeline = pipeline_with(&fx, transcriber);

        pipeline.run(&fx.audio_path).await.unwrap();

        let store =
            FsArtifactStore::new(fx.settings.sessions_dir().join("session 3 audio"));
        assert!(!store.has(artifacts::TRANSCRIPT_SEGMENTS));
    }

    #[tokio::test]
    async fn test_missing_audio_fails_before_any_stage() {
        let fx = fixture();
        let transcriber = Arc::new(MockTranscriber::new(vec!["x"]));
        let pipeline = pipeline_with(&fx, transcriber.clone());

        let result = pipeline.run(Path::new("/no/session.m4a")).await;
        assert!(result.is_err());
        assert_eq!(transcriber.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_resume_stage_progression() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        assert_eq!(resume_stage(&store), Stage::NotStarted);
        store.put(artifacts::TRANSCRIPT, "t").unwrap();
        assert_eq!(resume_stage(&store), Stage::Transcribed);
        store.put(artifacts::SUMMARY, "s").unwrap();
        assert_eq!(resume_stage(&store), Stage::Summarized);
        store.put(artifacts::MARKDOWN_SUMMARY, "m").unwrap();
        assert_eq!(resume_stage(&store), Stage::Formatted);
    }
}

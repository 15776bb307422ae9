//! Artifact storage for per-session pipeline outputs.
//!
//! Presence of a non-empty artifact is the cache-hit signal that lets a
//! completed stage be skipped when a run is repeated. A crash mid-write can
//! leave a truncated file; an empty one reads back as absent, anything else
//! is trusted.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Combined transcript of the session.
pub const TRANSCRIPT: &str = "transcript.txt";
/// Per-chunk transcripts, kept when the audio was split.
pub const TRANSCRIPT_SEGMENTS: &str = "transcript_segments.txt";
/// Prose summary of the session.
pub const SUMMARY: &str = "summary.txt";
/// Markdown-formatted summary.
pub const MARKDOWN_SUMMARY: &str = "summary.md";
/// Saved custom prompt and its response.
pub const CUSTOM_PROMPT: &str = "custom_prompt.txt";

/// Keyed store for stage outputs.
pub trait ArtifactStore: Send + Sync {
    /// Whether an artifact exists for the key.
    fn has(&self, key: &str) -> bool;
    /// Read an artifact. Missing or blank artifacts read as `None`.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Write an artifact, creating the store location if needed.
    fn put(&self, key: &str, value: &str) -> Result<()>;
}

/// Filesystem-backed store rooted at a per-session directory.
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The on-disk path for a key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn has(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

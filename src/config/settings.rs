//! Configuration settings for Saga.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub notes: NotesSettings,
    pub audio: AudioSettings,
    pub transcription: TranscriptionSettings,
    pub generation: GenerationSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory holding per-session artifact folders.
    pub sessions_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            sessions_dir: "sessions".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Session-notes settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesSettings {
    /// Directory containing per-session Markdown notes ("Session N.md").
    pub notes_dir: String,
    /// Output path for the combined-notes document.
    pub combined_file: String,
    /// How many of the most recent sessions to include as prompt context.
    pub context_sessions: usize,
    /// Copy the combined document to the clipboard when running `combine`.
    pub copy_to_clipboard: bool,
}

impl Default for NotesSettings {
    fn default() -> Self {
        Self {
            notes_dir: "~/dnd/Sessions".to_string(),
            combined_file: "combined_sessions.md".to_string(),
            context_sessions: 10,
            copy_to_clipboard: false,
        }
    }
}

/// Audio chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Upload size ceiling in bytes. Files above this are split.
    pub max_upload_bytes: u64,
    /// MP3 bitrate for exported chunks.
    pub chunk_bitrate: String,
    /// Length of the measurement sample used to estimate compressed size.
    pub sample_seconds: u32,
    /// Over-estimation factor applied to the chunk count.
    pub safety_factor: f64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: 25 * 1024 * 1024,
            chunk_bitrate: "48k".to_string(),
            sample_seconds: 60,
            safety_factor: 1.2,
        }
    }
}

/// Transcription service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Transcription model to use.
    pub model: String,
    /// Primary spoken language of the recordings (ISO-639-1).
    pub language: String,
    /// Decoding temperature. Zero keeps output deterministic.
    pub temperature: f32,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            language: "pt".to_string(),
            temperature: 0.0,
        }
    }
}

/// Text-generation service settings.
///
/// Any OpenAI-compatible chat-completions endpoint works; DeepSeek is the
/// default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Chat model for summaries and Markdown formatting.
    pub model: String,
    /// Base URL of the chat-completions API.
    pub api_base: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "deepseek-reasoner".to_string(),
            api_base: "https://api.deepseek.com".to_string(),
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SagaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("saga")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded sessions directory path.
    pub fn sessions_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.sessions_dir)
    }

    /// Get the expanded session-notes directory path.
    pub fn notes_dir(&self) -> PathBuf {
        Self::expand_path(&self.notes.notes_dir)
    }

    /// Get the expanded combined-notes output path.
    pub fn combined_file_path(&self) -> PathBuf {
        Self::expand_path(&self.notes.combined_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.audio.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(settings.transcription.model, "whisper-1");
        assert_eq!(settings.generation.api_key_env, "DEEPSEEK_API_KEY");
        assert_eq!(settings.notes.context_sessions, 10);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [transcription]
            language = "en"
            "#,
        )
        .unwrap();

        assert_eq!(settings.transcription.language, "en");
        assert_eq!(settings.transcription.model, "whisper-1");
        assert_eq!(settings.audio.chunk_bitrate, "48k");
    }

    #[test]
    fn test_settings_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.notes.notes_dir = "/campaign/Sessions".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.notes.notes_dir, "/campaign/Sessions");
    }
}

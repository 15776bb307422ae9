//! Prompt templates for Saga.
//!
//! Prompts can be customized by placing TOML files in the custom prompts
//! directory. The transcription priming prompt in particular should be
//! adapted to the campaign: proper nouns and table jargon are exactly what
//! the speech-to-text model gets wrong without it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub transcription: TranscriptionPrompts,
    pub generation: GenerationPrompts,
}

/// Prompts for the transcription service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionPrompts {
    /// Vocabulary priming passed with every audio request.
    pub priming: String,
}

impl Default for TranscriptionPrompts {
    fn default() -> Self {
        Self {
            priming: r#"This is a Dungeons & Dragons 5th Edition live play session. The DM narrates the story and the players roleplay their characters, mixing in-character dialogue with out-of-character banter and rules discussion.

Technical terms that will come up: Saving Throw, Check, Short Rest, Long Rest, Hit Points (HP), Armor Class (AC), Inspiration, Attunement, Strength, Dexterity, Constitution, Intelligence, Wisdom, Charisma, Acrobatics, Arcana, Athletics, Deception, History, Insight, Intimidation, Investigation, Medicine, Nature, Perception, Performance, Persuasion, Religion, Sleight of Hand, Stealth, Survival.

Transcribe all dialogue as spoken without translation."#
                .to_string(),
        }
    }
}

/// Prompts for the text-generation stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationPrompts {
    /// Instruction for the prose summary stage.
    pub summary: String,
    /// Instruction for the Markdown formatting stage.
    pub markdown: String,
    /// Instruction prefix for the whole-campaign summary.
    pub campaign: String,
    /// Preamble appended to custom prompts before the transcript.
    pub ask: String,
}

impl Default for GenerationPrompts {
    fn default() -> Self {
        Self {
            summary: r#"You are summarizing the transcript of a Dungeons & Dragons session. Write a thorough prose summary that captures the key plot points, character decisions, combat encounters, NPCs met, locations visited, items gained, and any unresolved threads or cliffhangers. Keep events in the order they happened. Ignore out-of-character banter unless it changed the course of play."#.to_string(),

            markdown: r#"Format the following Dungeons & Dragons session summary as a well-structured Markdown document. Use a level-1 heading with the session name, then sections such as "Recap", "Key Events", "NPCs", "Locations", and "Loot" where the content supports them. Keep the wording of the summary; only restructure and format it."#.to_string(),

            campaign: r#"Based on the following DnD session summaries, generate a comprehensive campaign summary. Ensure the summary captures key plot points, character developments, and significant events.

Session Summaries:"#
                .to_string(),

            ask: "Answer the prompt according to the following dnd session transcript:"
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the defaults, with optional custom directory.
    ///
    /// Files recognized in the custom directory: `transcription.toml` and
    /// `generation.toml`, each deserializing the matching prompt group.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let transcription_path = custom_path.join("transcription.toml");
            if transcription_path.exists() {
                let content = std::fs::read_to_string(&transcription_path)?;
                prompts.transcription = toml::from_str(&content)?;
            }

            let generation_path = custom_path.join("generation.toml");
            if generation_path.exists() {
                let content = std::fs::read_to_string(&generation_path)?;
                prompts.generation = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.transcription.priming.is_empty());
        assert!(!prompts.generation.summary.is_empty());
        assert!(prompts.generation.campaign.contains("campaign summary"));
    }

    #[test]
    fn test_custom_dir_overrides_group() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("transcription.toml"),
            r#"priming = "My campaign vocabulary""#,
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str()).unwrap();
        assert_eq!(prompts.transcription.priming, "My campaign vocabulary");
        // Untouched groups keep their defaults.
        assert!(!prompts.generation.summary.is_empty());
    }
}

//! Configuration module for Saga.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{GenerationPrompts, Prompts, TranscriptionPrompts};
pub use settings::{
    AudioSettings, GeneralSettings, GenerationSettings, NotesSettings, PromptSettings, Settings,
    TranscriptionSettings,
};

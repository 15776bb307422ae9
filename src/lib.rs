//! Saga - D&D session recaps
//!
//! A CLI tool that turns raw tabletop session recordings into written
//! recaps and keeps a campaign's notes in one place.
//!
//! # Overview
//!
//! Saga allows you to:
//! - Transcribe session recordings, splitting oversized files automatically
//! - Summarize transcripts with an LLM, grounded in previous session notes
//! - Format summaries as Markdown ready for a campaign wiki
//! - Combine per-session notes into a single campaign document
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt management
//! - `notes` - Session note discovery and aggregation
//! - `audio` - Audio chunking and concatenation (ffmpeg)
//! - `transcription` - Speech-to-text transcription
//! - `generation` - LLM summarization and formatting
//! - `artifacts` - Per-session artifact storage
//! - `pipeline` - Recap pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use saga::config::Settings;
//! use saga::pipeline::RecapPipeline;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = RecapPipeline::new(settings)?;
//!
//!     let outcome = pipeline.run(Path::new("session 12 audio.m4a")).await?;
//!     println!("Recap saved to {}", outcome.markdown_path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod artifacts;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod notes;
pub mod openai;
pub mod pipeline;
pub mod transcription;

pub use error::{Result, SagaError};

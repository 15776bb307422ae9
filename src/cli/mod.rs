//! CLI module for Saga.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Saga - D&D session recaps
///
/// Turns raw session recordings into written recaps: transcribes the audio,
/// summarizes it with an LLM, and keeps your campaign notes in one place.
#[derive(Parser, Debug)]
#[command(name = "saga")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full recap pipeline for a session recording
    Recap {
        /// Path to the session audio file
        audio_file: String,
    },

    /// Combine all session notes into a single document
    Combine {
        /// Copy the combined document to the clipboard
        #[arg(long)]
        copy: bool,

        /// Write to this file instead of the configured output path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate a whole-campaign summary from the combined notes
    Campaign,

    /// Ask a custom question about a stored session transcript
    Ask {
        /// Session id (the audio file stem used by `recap`)
        session: String,

        /// The prompt; read from stdin when omitted
        prompt: Option<String>,
    },

    /// Concatenate two session recordings into one file
    Join {
        /// First recording (plays first)
        first: String,

        /// Second recording
        second: String,

        /// Output file
        #[arg(short, long)]
        output: String,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Print the configuration file path
    Path,
}

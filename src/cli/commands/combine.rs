//! Combine command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::notes::{self, format_session_index};
use anyhow::Result;
use std::path::PathBuf;

/// Run the combine command.
pub fn run_combine(copy: bool, output: Option<String>, settings: Settings) -> Result<()> {
    let all_notes = notes::collect_session_notes(&settings.notes_dir())?;
    let combined = notes::combine_notes(&all_notes)?;

    let first = format_session_index(all_notes.first().map(|n| n.index).unwrap_or(0.0));
    let last = format_session_index(all_notes.last().map(|n| n.index).unwrap_or(0.0));
    Output::info(&format!(
        "Combined {} notes (sessions {} to {})",
        all_notes.len(),
        first,
        last
    ));

    let output_path = match output {
        Some(path) => PathBuf::from(path),
        None => settings.combined_file_path(),
    };
    std::fs::write(&output_path, &combined)?;
    Output::success(&format!("Combined notes saved to {}", output_path.display()));

    if copy || settings.notes.copy_to_clipboard {
        // Clipboard access fails on headless machines; the file is already
        // written, so this is not fatal.
        match notes::copy_to_clipboard(&combined) {
            Ok(()) => Output::success("Copied to clipboard"),
            Err(e) => Output::warning(&format!("{}", e)),
        }
    }

    Ok(())
}

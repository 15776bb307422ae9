//! Join command implementation.

use crate::audio::join_audio;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use std::path::Path;

/// Run the join command: concatenate two recordings into one file.
pub async fn run_join(first: &str, second: &str, output: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Join, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    Output::info(&format!("Joining '{}' + '{}'", first, second));

    join_audio(Path::new(first), Path::new(second), Path::new(output)).await?;

    Output::success(&format!("Combined audio saved to {}", output));
    Ok(())
}

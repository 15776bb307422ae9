//! Recap command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::RecapPipeline;
use anyhow::Result;
use std::path::Path;

/// Run the recap command.
pub async fn run_recap(audio_file: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Recap, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'saga doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    Output::info(&format!("Processing: {}", audio_file));

    let pipeline = RecapPipeline::new(settings)?;

    match pipeline.run(Path::new(audio_file)).await {
        Ok(outcome) => {
            println!();
            Output::stage("Transcript", outcome.transcript_cached);
            Output::stage("Summary", outcome.summary_cached);
            Output::stage("Markdown summary", outcome.markdown_cached);
            println!();
            Output::success(&format!(
                "Recap for '{}' saved to {}",
                outcome.session,
                outcome.markdown_path.display()
            ));
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Recap failed: {}", e));
            Err(e.into())
        }
    }
}

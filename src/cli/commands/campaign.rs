//! Campaign summary command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::error::SagaError;
use crate::generation::{self, ChatGenerator, TextGenerator};
use anyhow::Result;

/// Run the campaign command.
///
/// Reads the precompiled combined-notes document and asks the model for a
/// whole-campaign summary. Run `saga combine` first.
pub async fn run_campaign(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Generate, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let combined_path = settings.combined_file_path();
    if !combined_path.exists() {
        return Err(SagaError::Notes(format!(
            "Combined sessions file not found: {}. Run 'saga combine' first.",
            combined_path.display()
        ))
        .into());
    }

    let combined = std::fs::read_to_string(&combined_path)?;
    if combined.trim().is_empty() {
        return Err(SagaError::EmptyInput(format!(
            "Combined sessions file is empty: {}",
            combined_path.display()
        ))
        .into());
    }

    let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;
    let generator = ChatGenerator::from_settings(&settings.generation)?;

    Output::info("Generating campaign summary...");
    let spinner = Output::spinner("Waiting for the model...");
    let prompt = generation::campaign_prompt(&prompts.generation.campaign, &combined);
    let response = generator.complete(&prompt).await?;
    spinner.finish_and_clear();

    println!("\n{}\n", response);

    let output_path = combined_path.with_file_name("campaign_summary.txt");
    std::fs::write(&output_path, &response)?;
    Output::success(&format!("Campaign summary saved to {}", output_path.display()));

    Ok(())
}

//! Ask command implementation.

use crate::artifacts::{self, ArtifactStore, FsArtifactStore};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::error::SagaError;
use crate::generation::{self, ChatGenerator, TextGenerator};
use anyhow::Result;
use std::io::BufRead;

/// Run the ask command: a custom prompt against one session's transcript.
pub async fn run_ask(session: &str, prompt: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Generate, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let store = FsArtifactStore::new(settings.sessions_dir().join(session));
    let transcript = store.get(artifacts::TRANSCRIPT)?.ok_or_else(|| {
        SagaError::Notes(format!(
            "No transcript for session '{}' at {}. Run 'saga recap' first.",
            session,
            store.path_for(artifacts::TRANSCRIPT).display()
        ))
    })?;

    let custom_prompt = match prompt {
        Some(p) => p,
        None => read_prompt_from_stdin()?,
    };
    if custom_prompt.trim().is_empty() {
        return Err(SagaError::EmptyInput("Custom prompt cannot be empty".into()).into());
    }

    let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;
    let generator = ChatGenerator::from_settings(&settings.generation)?;

    Output::info(&format!("Asking about session '{}'...", session));
    let spinner = Output::spinner("Waiting for the model...");
    let full_prompt =
        generation::ask_prompt(&custom_prompt, &prompts.generation.ask, &transcript);
    let response = generator.complete(&full_prompt).await?;
    spinner.finish_and_clear();

    println!("\n{}\n", response);

    store.put(
        artifacts::CUSTOM_PROMPT,
        &format!("Prompt:\n{}\n\nResponse:\n{}", custom_prompt, response),
    )?;
    Output::success(&format!(
        "Response saved to {}",
        store.path_for(artifacts::CUSTOM_PROMPT).display()
    ));

    Ok(())
}

/// Read a multi-line prompt from stdin, terminated by a blank line.
fn read_prompt_from_stdin() -> crate::error::Result<String> {
    println!("Enter your prompt (finish with an empty line):");

    let stdin = std::io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }

    Ok(lines.join("\n"))
}

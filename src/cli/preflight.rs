//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and credentials are available before
//! starting operations that would otherwise fail midway, after minutes of
//! uploading.

use crate::config::Settings;
use crate::error::{Result, SagaError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// The full recap pipeline: tools plus both API keys.
    Recap,
    /// Text generation only (campaign summaries, custom prompts).
    Generate,
    /// Audio concatenation: ffmpeg only.
    Join,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Recap => {
            check_tool("ffmpeg")?;
            check_tool("ffprobe")?;
            check_env("OPENAI_API_KEY")?;
            check_env(&settings.generation.api_key_env)?;
        }
        Operation::Generate => {
            check_env(&settings.generation.api_key_env)?;
        }
        Operation::Join => {
            check_tool("ffmpeg")?;
        }
    }
    Ok(())
}

/// Check that an environment variable holds a non-empty value.
fn check_env(name: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(()),
        Ok(_) => Err(SagaError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            name, name
        ))),
        Err(_) => Err(SagaError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            name, name
        ))),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("-version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(SagaError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SagaError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(SagaError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_env_missing_is_error() {
        let result = check_env("SAGA_TEST_KEY_THAT_DOES_NOT_EXIST");
        assert!(result.is_err());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("SAGA_TEST_KEY_THAT_DOES_NOT_EXIST"));
    }
}

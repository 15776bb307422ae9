//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use crate::transcription::is_api_key_configured;
use console::style;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Saga Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("External Tools").bold());
    checks.push(check_tool("ffmpeg"));
    checks.push(check_tool("ffprobe"));
    for check in &checks {
        check.print();
    }
    println!();

    println!("{}", style("API Keys").bold());
    let api_checks = vec![
        check_openai_key(),
        check_generation_key(&settings.generation.api_key_env),
    ];
    for check in &api_checks {
        check.print();
    }
    checks.extend(api_checks);
    println!();

    println!("{}", style("Configuration").bold());
    let config_checks = vec![check_notes_dir(settings), check_config_file()];
    for check in &config_checks {
        check.print();
    }
    checks.extend(config_checks);
    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Warning)
        .count();

    if errors == 0 && warnings == 0 {
        Output::success("All checks passed. Ready to run 'saga recap'.");
    } else if errors == 0 {
        Output::warning(&format!("{} warning(s). Saga should still work.", warnings));
    } else {
        Output::error(&format!(
            "{} error(s), {} warning(s). Fix the errors above before running a recap.",
            errors, warnings
        ));
    }

    Ok(())
}

fn check_tool(name: &str) -> CheckResult {
    match Command::new(name).arg("-version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("unknown version")
                .to_string();
            CheckResult::ok(name, &version)
        }
        _ => CheckResult::error(
            name,
            "not found",
            "Install ffmpeg (includes ffprobe): https://ffmpeg.org/download.html",
        ),
    }
}

fn check_openai_key() -> CheckResult {
    if is_api_key_configured() {
        CheckResult::ok("OPENAI_API_KEY", "set")
    } else {
        CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Transcription needs it: export OPENAI_API_KEY='sk-...'",
        )
    }
}

fn check_generation_key(api_key_env: &str) -> CheckResult {
    match std::env::var(api_key_env) {
        Ok(key) if !key.is_empty() => CheckResult::ok(api_key_env, "set"),
        _ => CheckResult::error(
            api_key_env,
            "not set",
            "Summarization needs it; also loaded from a .env file in the working directory",
        ),
    }
}

fn check_notes_dir(settings: &Settings) -> CheckResult {
    let dir = settings.notes_dir();
    if dir.is_dir() {
        CheckResult::ok("notes directory", &dir.display().to_string())
    } else {
        CheckResult::warning(
            "notes directory",
            &format!("{} does not exist", dir.display()),
            "Set notes.notes_dir in the config to your session notes folder",
        )
    }
}

fn check_config_file() -> CheckResult {
    let path = Settings::default_config_path();
    if path.exists() {
        CheckResult::ok("config file", &path.display().to_string())
    } else {
        CheckResult::warning(
            "config file",
            "not found (using defaults)",
            "Run 'saga config edit' to create one",
        )
    }
}

//! Session note aggregation.
//!
//! Session notes are Markdown files named like `Session 7.md` or
//! `Session 5.5.md`. The numeric index embedded in the filename, not the
//! directory listing order, decides the order they appear in the combined
//! document.

use crate::error::{Result, SagaError};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Separator line between sessions in the combined document.
const SESSION_SEPARATOR: &str = "========================================";

/// A session note file with its parsed ordering index.
#[derive(Debug, Clone)]
pub struct SessionNote {
    /// Numeric session index. Fractional for interludes ("Session 5.5").
    pub index: f64,
    /// Filename stem, used as the note's heading.
    pub title: String,
    pub path: PathBuf,
}

/// Parse a session filename into its numeric index and title.
///
/// The index is the second whitespace-delimited token of the stem
/// (`"Session 12.md"` -> 12). A second token that is not a number is an
/// error, not a skip: a typo in a filename should surface, not silently
/// drop a session from the timeline.
pub fn parse_session_filename(file_name: &str) -> Result<(f64, String)> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| SagaError::InvalidInput(format!("Invalid filename: {}", file_name)))?;

    let token = stem.split_whitespace().nth(1).ok_or_else(|| {
        SagaError::InvalidInput(format!("No session number in filename: {}", file_name))
    })?;

    let index: f64 = token.trim().parse().map_err(|_| {
        SagaError::InvalidInput(format!(
            "Cannot parse session number '{}' in filename: {}",
            token, file_name
        ))
    })?;

    Ok((index, stem.to_string()))
}

/// Format a session index the way it appears in filenames.
///
/// Integral indices print as whole numbers (2, not 2.0); fractional ones
/// keep their fraction (5.5).
pub fn format_session_index(index: f64) -> String {
    if index.fract() == 0.0 {
        format!("{}", index as i64)
    } else {
        index.to_string()
    }
}

/// Collect all session notes in a directory, sorted by session index.
///
/// Matches files whose name starts with a case-insensitive "session" and
/// ends in `.md`. Fails if the directory is missing or no notes match.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn collect_session_notes(dir: &Path) -> Result<Vec<SessionNote>> {
    if !dir.is_dir() {
        return Err(SagaError::Notes(format!(
            "Session notes directory not found: {}",
            dir.display()
        )));
    }

    let mut notes = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();

        if !file_name.to_lowercase().starts_with("session") || !file_name.ends_with(".md") {
            continue;
        }

        let (index, title) = parse_session_filename(&file_name)?;
        notes.push(SessionNote {
            index,
            title,
            path: entry.path(),
        });
    }

    if notes.is_empty() {
        return Err(SagaError::Notes(format!(
            "No session notes found in: {}",
            dir.display()
        )));
    }

    notes.sort_by(|a, b| a.index.total_cmp(&b.index));
    debug!("Found {} session notes", notes.len());

    Ok(notes)
}

/// Combine session notes into one document.
///
/// Each note becomes `# <title>` followed by its raw content; notes are
/// joined with a 40-character `=` rule and the result is trimmed.
pub fn combine_notes(notes: &[SessionNote]) -> Result<String> {
    let mut parts = Vec::with_capacity(notes.len());

    for note in notes {
        let content = std::fs::read_to_string(&note.path).map_err(|e| {
            SagaError::Notes(format!("Cannot read {}: {}", note.path.display(), e))
        })?;
        parts.push(format!("# {}\n\n{}", note.title, content));
    }

    let separator = format!("\n\n{}\n\n", SESSION_SEPARATOR);
    Ok(parts.join(&separator).trim().to_string())
}

/// Combine only the most recent `last_n` notes, for prompt context.
pub fn combine_recent_notes(notes: &[SessionNote], last_n: usize) -> Result<String> {
    let start = notes.len().saturating_sub(last_n);
    combine_notes(&notes[start..])
}

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| SagaError::Notes(format!("Clipboard unavailable: {}", e)))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| SagaError::Notes(format!("Clipboard copy failed: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_note(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_parse_session_filename() {
        let (index, title) = parse_session_filename("Session 12.md").unwrap();
        assert_eq!(index, 12.0);
        assert_eq!(title, "Session 12");
    }

    #[test]
    fn test_parse_fractional_index() {
        let (index, _) = parse_session_filename("Session 5.5.md").unwrap();
        assert_eq!(index, 5.5);
    }

    #[test]
    fn test_parse_malformed_index_is_error() {
        assert!(parse_session_filename("Session finale.md").is_err());
        assert!(parse_session_filename("Session.md").is_err());
    }

    #[test]
    fn test_format_session_index() {
        assert_eq!(format_session_index(2.0), "2");
        assert_eq!(format_session_index(5.5), "5.5");
        assert_eq!(format_session_index(10.0), "10");
    }

    #[test]
    fn test_notes_sorted_numerically_not_lexically() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "Session 10.md", "ten");
        write_note(dir.path(), "Session 1.md", "one");
        write_note(dir.path(), "Session 2.md", "two");

        let notes = collect_session_notes(dir.path()).unwrap();
        let indices: Vec<f64> = notes.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![1.0, 2.0, 10.0]);
    }

    #[test]
    fn test_fractional_sessions_slot_between_integers() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "Session 6.md", "");
        write_note(dir.path(), "Session 5.5.md", "");
        write_note(dir.path(), "Session 5.md", "");

        let notes = collect_session_notes(dir.path()).unwrap();
        let indices: Vec<f64> = notes.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![5.0, 5.5, 6.0]);
    }

    #[test]
    fn test_non_session_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "Session 1.md", "one");
        write_note(dir.path(), "README.md", "not a session");
        write_note(dir.path(), "Session 2.txt", "wrong extension");

        let notes = collect_session_notes(dir.path()).unwrap();
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_case_insensitive_session_marker() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "session 3.md", "lower");
        write_note(dir.path(), "SESSION 4.md", "upper");

        let notes = collect_session_notes(dir.path()).unwrap();
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn test_missing_directory_is_error() {
        let result = collect_session_notes(Path::new("/does/not/exist"));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_session_notes(dir.path()).is_err());
    }

    #[test]
    fn test_malformed_filename_fails_collection() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "Session 1.md", "fine");
        write_note(dir.path(), "Session finale.md", "broken");

        assert!(collect_session_notes(dir.path()).is_err());
    }

    #[test]
    fn test_combine_notes_headings_and_separator() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "Session 2.md", "The heist.");
        write_note(dir.path(), "Session 1.md", "The tavern.");

        let notes = collect_session_notes(dir.path()).unwrap();
        let combined = combine_notes(&notes).unwrap();

        assert!(combined.starts_with("# Session 1\n\nThe tavern."));
        assert!(combined.contains(SESSION_SEPARATOR));
        assert!(combined.ends_with("The heist."));
        // Separator between notes, not after the last one.
        assert_eq!(combined.matches(SESSION_SEPARATOR).count(), 1);
    }

    #[test]
    fn test_combine_recent_notes_takes_tail() {
        let dir = tempfile::tempdir().unwrap();
        for i in 1..=5 {
            write_note(dir.path(), &format!("Session {}.md", i), &format!("s{}", i));
        }

        let notes = collect_session_notes(dir.path()).unwrap();
        let recent = combine_recent_notes(&notes, 2).unwrap();

        assert!(!recent.contains("# Session 3"));
        assert!(recent.contains("# Session 4"));
        assert!(recent.contains("# Session 5"));
    }
}

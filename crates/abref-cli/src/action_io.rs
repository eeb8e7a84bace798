//! GitHub Actions runner file and workflow-command protocol.
//!
//! Step outputs and the job summary are appended to the files the runner
//! names in `GITHUB_OUTPUT` and `GITHUB_STEP_SUMMARY`. Failures are reported
//! with an `::error::` workflow command on stdout.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

/// Sinks for step outputs and the job summary. Either may be absent when
/// running outside a workflow.
#[derive(Debug, Clone, Default)]
pub struct ActionIo {
    output_file: Option<PathBuf>,
    summary_file: Option<PathBuf>,
}

impl ActionIo {
    pub fn new(output_file: Option<PathBuf>, summary_file: Option<PathBuf>) -> Self {
        Self {
            output_file,
            summary_file,
        }
    }

    /// Set a step output using the heredoc form, which is safe for any value.
    pub fn set_output(&self, name: &str, value: &str) -> Result<()> {
        info!(output = name, value = value, "setting step output");
        let Some(path) = &self.output_file else {
            return Ok(());
        };
        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        append(path, &format_output(name, value, &delimiter))
    }

    /// Append Markdown to the job summary.
    pub fn append_summary(&self, markdown: &str) -> Result<()> {
        match &self.summary_file {
            Some(path) => append(path, markdown),
            None => Ok(()),
        }
    }
}

fn append(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn format_output(name: &str, value: &str, delimiter: &str) -> String {
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Escape a workflow command message.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Render an `::error::` workflow command.
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_output_heredoc() {
        assert_eq!(
            format_output("ab-numbers", r#"["AB#1"]"#, "EOF_X"),
            "ab-numbers<<EOF_X\n[\"AB#1\"]\nEOF_X\n"
        );
    }

    #[test]
    fn test_set_output_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "existing=1\n").unwrap();

        let io = ActionIo::new(Some(path.clone()), None);
        io.set_output("ab-numbers", "[]").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "existing=1");
        assert!(lines[1].starts_with("ab-numbers<<ghadelimiter_"));
        assert_eq!(lines[2], "[]");
        assert_eq!(lines[3], lines[1].trim_start_matches("ab-numbers<<"));
    }

    #[test]
    fn test_append_summary_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");

        let io = ActionIo::new(None, Some(path.clone()));
        io.append_summary("# one\n").unwrap();
        io.append_summary("# two\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# one\n# two\n");
    }

    #[test]
    fn test_without_files_is_noop() {
        let io = ActionIo::default();
        io.set_output("ab-numbers", "[]").unwrap();
        io.append_summary("ignored").unwrap();
    }

    #[test]
    fn test_error_command_escapes_newlines_and_percent() {
        assert_eq!(
            error_command("100% broken\r\nnext line"),
            "::error::100%25 broken%0D%0Anext line"
        );
    }
}

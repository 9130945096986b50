//! Code Formatting Module
//!
//! Pipes generated Go code through an external formatter found on `PATH`:
//! - `goimports` (preferred, also normalizes the import block)
//! - `gofmt`

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Formatters in order of preference
pub const FORMATTERS: &[&str] = &["goimports", "gofmt"];

/// Format Go code with the first available formatter
pub fn format_go(code: &str) -> Result<String, FormatError> {
    let (formatter, path) = FORMATTERS
        .iter()
        .find_map(|name| which::which(name).ok().map(|path| (*name, path)))
        .ok_or(FormatError::NoFormatter)?;
    run_formatter(formatter, &path, code)
}

/// Formatters found on `PATH`
pub fn available_formatters() -> Vec<&'static str> {
    FORMATTERS
        .iter()
        .copied()
        .filter(|name| is_formatter_available(name))
        .collect()
}

/// Check whether an executable is on `PATH`
pub fn is_formatter_available(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Run the formatter binary at `path` with `code` on stdin
pub fn run_formatter(formatter: &str, path: &Path, code: &str) -> Result<String, FormatError> {
    debug!(formatter, path = %path.display(), "formatting Go code");
    let spawn_error = |e: std::io::Error| FormatError::Spawn {
        formatter: formatter.to_string(),
        message: e.to_string(),
    };

    let mut child = Command::new(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(code.as_bytes()).map_err(spawn_error)?;
    }

    let output = child.wait_with_output().map_err(spawn_error)?;

    if !output.status.success() {
        return Err(FormatError::Rejected {
            formatter: formatter.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout).map_err(|e| FormatError::Rejected {
        formatter: formatter.to_string(),
        message: e.to_string(),
    })
}

/// Formatting errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Neither `goimports` nor `gofmt` is installed
    NoFormatter,
    /// The formatter could not be run
    Spawn { formatter: String, message: String },
    /// The formatter refused the code (usually a syntax error)
    Rejected { formatter: String, message: String },
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::NoFormatter => {
                write!(f, "No Go formatter found on PATH (tried {})", FORMATTERS.join(", "))
            }
            FormatError::Spawn { formatter, message } => {
                write!(f, "Failed to run {}: {}", formatter, message)
            }
            FormatError::Rejected { formatter, message } => {
                write!(f, "{} rejected the code: {}", formatter, message)
            }
        }
    }
}

impl std::error::Error for FormatError {}

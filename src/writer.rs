//! Output writer
//!
//! Persists the files returned by the generation engine: creates parent
//! directories, formats Go sources and applies the overwrite policy to
//! files that already exist.

use crate::error::Result;
use crate::format::{self, FormatError};
use crate::model::OutputFile;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What to do with a file that already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Ask on the terminal for every existing file
    #[default]
    Ask,
    Overwrite,
    /// Never touch existing files
    Keep,
}

/// Outcome of a write pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Answers "overwrite this file?" in [`OverwritePolicy::Ask`] mode
pub type Confirm = Box<dyn FnMut(&Path) -> io::Result<bool>>;

/// Writes output files to disk
pub struct Writer {
    policy: OverwritePolicy,
    format: bool,
    confirm: Confirm,
}

impl Writer {
    pub fn new(policy: OverwritePolicy, format: bool) -> Self {
        Self {
            policy,
            format,
            confirm: Box::new(ask_on_terminal),
        }
    }

    /// Replace the terminal prompt
    pub fn with_confirm(mut self, confirm: Confirm) -> Self {
        self.confirm = confirm;
        self
    }

    /// Write every file, in order
    pub fn write_all(&mut self, files: &[OutputFile]) -> Result<WriteReport> {
        let mut report = WriteReport::default();

        if self.format && files.iter().any(OutputFile::is_go) && format::available_formatters().is_empty() {
            warn!("{}, writing Go files unformatted", FormatError::NoFormatter);
            self.format = false;
        }

        for file in files {
            if file.path.exists() && !self.may_overwrite(&file.path)? {
                info!(path = %file.path.display(), "kept existing file");
                report.skipped.push(file.path.clone());
                continue;
            }

            if let Some(parent) = file.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }

            fs::write(&file.path, self.content(file))?;
            info!(path = %file.path.display(), "wrote file");
            report.written.push(file.path.clone());
        }

        Ok(report)
    }

    fn may_overwrite(&mut self, path: &Path) -> Result<bool> {
        Ok(match self.policy {
            OverwritePolicy::Overwrite => true,
            OverwritePolicy::Keep => false,
            OverwritePolicy::Ask => (self.confirm)(path)?,
        })
    }

    fn content(&self, file: &OutputFile) -> Vec<u8> {
        if !self.format || !file.is_go() {
            return file.content.clone();
        }
        match format::format_go(&file.text()) {
            Ok(formatted) => formatted.into_bytes(),
            Err(e) => {
                warn!(path = %file.path.display(), error = %e, "formatting failed, writing raw output");
                file.content.clone()
            }
        }
    }
}

/// Prompt on stderr and read a yes/no answer from stdin
fn ask_on_terminal(path: &Path) -> io::Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{} already exists, overwrite? [y/N] ", path.display())?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

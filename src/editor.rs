//! Editor abstraction for drafting journal entries.
//!
//! The editor is the one interactive seam the edit flow cannot exercise from a test
//! without user interaction, so it sits behind a trait: production code uses
//! [`TemplateEditor`], which expands a `vim {filepath}`-style command
//! template, while tests substitute a scripted implementation.

use crate::constants::{ENV_VAR_CI, ENV_VAR_TEST_PASSPHRASE, FILEPATH_PLACEHOLDER};
use crate::errors::{AppResult, EditorError};
use std::io::{BufRead, Write};
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Interface for opening a draft file in an editor.
///
/// The call blocks until the editor process exits. Implementations must
/// distinguish "the editor command does not exist" from other failures,
/// since the former is user-fixable configuration.
pub trait Editor {
    /// Opens `path` for editing and waits for the editor to finish.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::CommandNotFound`] when the configured command
    /// cannot be located, [`EditorError::NonZeroExit`] when the editor exits
    /// with a failure status, and [`EditorError::ExecutionFailed`] for any
    /// other spawn failure.
    fn open(&self, path: &Path) -> AppResult<()>;
}

/// Runs an editor command template against the draft path.
///
/// The template is split on whitespace; a `{filepath}` token is replaced by
/// the draft path, and a template without the placeholder gets the path
/// appended as the final argument.
pub struct TemplateEditor {
    template: String,
}

impl TemplateEditor {
    pub fn new(template: impl Into<String>) -> Self {
        TemplateEditor {
            template: template.into(),
        }
    }

    fn build_command(&self, path: &Path) -> Vec<String> {
        let mut parts: Vec<String> = self
            .template
            .split_whitespace()
            .map(|part| {
                if part == FILEPATH_PLACEHOLDER {
                    path.display().to_string()
                } else {
                    part.to_string()
                }
            })
            .collect();

        if !self.template.contains(FILEPATH_PLACEHOLDER) {
            parts.push(path.display().to_string());
        }
        parts
    }
}

impl Editor for TemplateEditor {
    fn open(&self, path: &Path) -> AppResult<()> {
        let parts = self.build_command(path);
        info!("Opening draft {:?}", path);
        run_foreground(&parts)?;
        Ok(())
    }
}

/// Runs `parts` as a foreground child process and checks its exit status.
///
/// Shared by the editor and the interactive store shell, which have the same
/// spawn/wait/exit-code discipline.
pub(crate) fn run_foreground(parts: &[String]) -> Result<(), EditorError> {
    let (program, args) = parts.split_first().ok_or_else(|| EditorError::ExecutionFailed {
        command: String::new(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
    })?;

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EditorError::CommandNotFound {
                command: program.clone(),
                source: e,
            },
            _ => EditorError::ExecutionFailed {
                command: program.clone(),
                source: e,
            },
        })?;

    if !status.success() {
        return Err(EditorError::NonZeroExit {
            command: program.clone(),
            status_code: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}

/// Blocks until the operator confirms the draft is final.
///
/// Some editors fork and return before the user has finished writing, so
/// the draft is only read back after an explicit Enter. Skipped when the
/// process is driven by automation.
pub fn confirm_done() -> AppResult<()> {
    if std::env::var(ENV_VAR_TEST_PASSPHRASE).is_ok() || std::env::var(ENV_VAR_CI).is_ok() {
        return Ok(());
    }

    print!("Press Enter when done.");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

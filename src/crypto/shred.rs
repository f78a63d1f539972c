//! Best-effort secure erasure of transient plaintext files.
//!
//! Erasure is delegated to an external secure-delete utility (`shred` by
//! default) which overwrites the file contents before unlinking it. The
//! contract is "attempted secure erasure": journaling filesystems and SSD
//! wear-leveling can retain recoverable remnants regardless.

use crate::constants::{DB_ARTIFACT_PREFIX, ENTRY_ARTIFACT_PREFIX};
use crate::errors::{AppResult, EraseError};
use std::io;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Filename prefixes that mark a file as an erasable transient artifact.
pub const ERASABLE_PREFIXES: &[&str] = &[DB_ARTIFACT_PREFIX, ENTRY_ARTIFACT_PREFIX];

/// Invokes the external secure-delete tool on transient plaintext files.
///
/// The eraser refuses to touch any path whose filename does not carry an
/// erasable prefix. That check is a guardrail against coding errors, not a
/// security boundary: being asked to shred an unrelated file is a bug.
#[derive(Debug, Clone)]
pub struct Shredder {
    command: String,
}

impl Shredder {
    pub fn new(command: impl Into<String>) -> Self {
        Shredder {
            command: command.into(),
        }
    }

    /// Overwrites and unlinks `path` via the secure-delete tool.
    ///
    /// # Panics
    ///
    /// Panics if the filename lacks an erasable prefix; see the type docs.
    ///
    /// # Errors
    ///
    /// Returns `EraseError` if the tool is missing or exits non-zero. Erase
    /// failures are never swallowed by callers: leftover plaintext breaks the
    /// core promise of the application.
    pub fn erase(&self, path: &Path) -> AppResult<()> {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        assert!(
            ERASABLE_PREFIXES.iter().any(|p| file_name.starts_with(p)),
            "refusing to shred {:?}: filename lacks an erasable prefix",
            path
        );

        debug!("Shredding {:?}", path);

        // -f forces permission changes (view drafts are chmod 0400),
        // -u removes the directory entry after overwriting.
        let output = Command::new(&self.command)
            .arg("-f")
            .arg("-u")
            .arg("--")
            .arg(path)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => EraseError::ToolNotFound {
                    command: self.command.clone(),
                    path: path.to_path_buf(),
                    source: e,
                },
                _ => EraseError::ToolFailed {
                    path: path.to_path_buf(),
                    diagnostic: e.to_string(),
                },
            })?;

        if !output.status.success() {
            return Err(EraseError::ToolFailed {
                path: path.to_path_buf(),
                diagnostic: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(())
    }
}

//! Journal operations: one module per CLI verb family.
//!
//! Each operation receives its collaborators (cipher, shredder, editor)
//! explicitly, so tests can drive the full flow with scripted stand-ins for
//! the external tools.

pub mod edit;
pub mod init;
pub mod migrate;
pub mod shell;

use crate::errors::AppError;
use std::path::Path;

/// Validates that the encrypted journal exists at `input` before any
/// passphrase is collected or plaintext is materialized.
pub(crate) fn check_input_path(input: &Path) -> Result<(), AppError> {
    if !input.exists() {
        return Err(AppError::Usage(format!(
            "Input journal file {} doesn't exist.",
            input.display()
        )));
    }
    if !input.is_file() {
        return Err(AppError::Usage(format!(
            "Input journal file {} is not a file.",
            input.display()
        )));
    }
    Ok(())
}

//! Debug escape: an interactive sqlite shell on the working copy.

use crate::crypto::gpg::Cipher;
use crate::crypto::passphrase;
use crate::crypto::session::{with_session, SessionMode};
use crate::crypto::shred::Shredder;
use crate::editor::run_foreground;
use crate::errors::{AppError, AppResult};
use std::path::Path;
use tracing::warn;

/// Opens the `sqlite3` REPL on the decrypted working copy.
///
/// Runs inside a writable session, so whatever the shell commits is sealed
/// back to `output` when it exits cleanly; quitting the shell with a failure
/// status discards everything. A second connection on the working copy is
/// fine since the session's own connection sits idle while the shell runs.
pub fn store_shell(
    cipher: &dyn Cipher,
    shredder: &Shredder,
    shell_command: &str,
    input: &Path,
    output: &Path,
) -> AppResult<()> {
    super::check_input_path(input)?;
    warn!("Opening a raw shell on the plaintext working copy");

    let passphrase = passphrase::existing()?;
    with_session(
        cipher,
        shredder,
        &passphrase,
        input,
        output,
        SessionMode::Writable,
        |conn| {
            let working = conn.path().ok_or_else(|| {
                AppError::Config("working copy connection has no path".to_string())
            })?;
            let parts = vec![shell_command.to_string(), working.to_string()];
            run_foreground(&parts)?;
            Ok(())
        },
    )
}

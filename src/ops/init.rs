//! Creation of a fresh, empty, encrypted journal.

use crate::constants::DB_ARTIFACT_PREFIX;
use crate::crypto::gpg::Cipher;
use crate::crypto::passphrase;
use crate::crypto::session::seal;
use crate::crypto::shred::Shredder;
use crate::crypto::temp::TempArtifact;
use crate::db;
use crate::errors::{AppError, AppResult, StoreError};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

/// Creates an empty journal at `output`.
///
/// Refuses to touch an existing file. The schema is built in a plaintext
/// temp store beside the destination, the passphrase is prompted twice, and
/// only then does the sealed journal land at `output` by atomic rename. The
/// temp store is shredded on every exit path.
pub fn init_journal(cipher: &dyn Cipher, shredder: &Shredder, output: &Path) -> AppResult<()> {
    if output.exists() {
        return Err(AppError::Usage(format!(
            "Output file {} already exists.",
            output.display()
        )));
    }

    let workdir = match output.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    };
    let scratch = TempArtifact::ephemeral(workdir, DB_ARTIFACT_PREFIX, shredder)?;

    let conn = Connection::open(scratch.path())?;
    db::create_schema(&conn)?;
    conn.close().map_err(|(_conn, e)| StoreError::Sqlite(e))?;

    let passphrase = passphrase::new_with_confirmation()?;
    seal(cipher, shredder, &passphrase, scratch.path(), output)?;
    scratch.release()?;

    info!("Created journal at {:?}", output);
    println!("Journal created successfully.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UnusedCipher;
    impl Cipher for UnusedCipher {
        fn encrypt(&self, _: &secrecy::SecretString, _: &Path, _: &Path) -> AppResult<()> {
            unreachable!()
        }
        fn decrypt(&self, _: &secrecy::SecretString, _: &Path, _: &Path) -> AppResult<()> {
            unreachable!()
        }
    }

    #[test]
    fn test_init_refuses_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let journal = dir.path().join("encrypted-journal");
        std::fs::write(&journal, b"old").unwrap();

        let err = init_journal(&UnusedCipher, &Shredder::new("shred"), &journal).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read(&journal).unwrap(), b"old");
    }
}

//! The encrypted session: decrypt → operate → (re-encrypt) → shred.
//!
//! A session materializes the encrypted journal as a plaintext working copy
//! in the journal's own directory, opens the relational store on it, and
//! hands the store to the caller. On caller success (and a writable session)
//! the working copy is re-encrypted and atomically renamed onto the
//! destination; on caller failure re-encryption is skipped entirely, leaving
//! the destination byte-identical. On every exit path the working copy is
//! shredded before control returns.

use crate::constants::DB_ARTIFACT_PREFIX;
use crate::crypto::gpg::Cipher;
use crate::crypto::shred::Shredder;
use crate::crypto::temp::TempArtifact;
use crate::errors::{AppResult, StoreError};
use rusqlite::{Connection, OpenFlags};
use secrecy::SecretString;
use std::path::Path;
use tracing::{debug, error};

/// Whether the session re-encrypts the working copy back to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// The working copy is opened read-only and never written back.
    ReadOnly,
    /// Caller mutations are re-encrypted to the destination on success.
    Writable,
}

impl SessionMode {
    fn is_writable(self) -> bool {
        matches!(self, SessionMode::Writable)
    }
}

/// Runs `body` against the decrypted working copy of `source`.
///
/// Steps: decrypt `source` into an ephemeral working copy, open the store,
/// invoke `body`. If `body` returns `Ok` and the session is writable, the
/// working copy is sealed (encrypt + atomic rename) onto `dest` strictly
/// after the store connection is closed and strictly before the working copy
/// is shredded. If `body` returns `Err`, sealing is skipped and `dest` is
/// left exactly as it was.
///
/// The destination is never partially written: the new ciphertext lands in a
/// sibling temp file first and replaces `dest` by rename, so a failure at
/// any step leaves the last successfully sealed journal as the durable
/// state.
///
/// # Errors
///
/// Body errors take precedence; failures of the seal step or of the shred
/// step are surfaced even when the body succeeded, since leaving the
/// destination stale or plaintext behind must never pass silently.
pub fn with_session<T>(
    cipher: &dyn Cipher,
    shredder: &Shredder,
    passphrase: &SecretString,
    source: &Path,
    dest: &Path,
    mode: SessionMode,
    body: impl FnOnce(&mut Connection) -> AppResult<T>,
) -> AppResult<T> {
    let workdir = working_dir(source);
    let working = TempArtifact::ephemeral(workdir, DB_ARTIFACT_PREFIX, shredder)?;

    let outcome = run_session(
        cipher,
        shredder,
        passphrase,
        source,
        dest,
        mode,
        working.path(),
        body,
    );

    // Every session exit, including a failed decrypt or open, releases the
    // working copy here so an erase failure is never left to the Drop
    // fallback alone.
    let erase_result = working.release();
    if let Err(err) = &erase_result {
        // Keep the erase failure visible even when another error outranks it.
        error!("Working copy not erased: {}", err);
        eprintln!("Warning: {}", err);
    }

    let value = outcome?;
    erase_result?;
    Ok(value)
}

/// Decrypt, open, run the body, close, seal. Cleanup of the working copy
/// stays with the caller.
#[allow(clippy::too_many_arguments)]
fn run_session<T>(
    cipher: &dyn Cipher,
    shredder: &Shredder,
    passphrase: &SecretString,
    source: &Path,
    dest: &Path,
    mode: SessionMode,
    working: &Path,
    body: impl FnOnce(&mut Connection) -> AppResult<T>,
) -> AppResult<T> {
    cipher.decrypt(passphrase, source, working)?;
    debug!("Session open on working copy {:?}", working);

    let mut conn = open_store(working, mode)?;
    let outcome = body(&mut conn);

    // All committed caller mutations are on disk once the connection closes.
    let close_result: AppResult<()> = conn
        .close()
        .map_err(|(_conn, err)| StoreError::Sqlite(err).into());

    let seal_result = match (&outcome, &close_result) {
        (Ok(_), Ok(())) if mode.is_writable() => seal(cipher, shredder, passphrase, working, dest),
        _ => Ok(()),
    };

    let value = outcome?;
    close_result?;
    seal_result?;
    Ok(value)
}

/// Encrypts `plaintext` and atomically replaces `dest` with the result.
///
/// The ciphertext is staged in a temp file beside `dest` and renamed into
/// place, so `dest` either fully changes or does not change at all. A failed
/// encryption shreds the staged partial output and leaves `dest` untouched.
///
/// Also used by `init`, which seals a freshly created store without an
/// existing source to decrypt.
pub fn seal(
    cipher: &dyn Cipher,
    shredder: &Shredder,
    passphrase: &SecretString,
    plaintext: &Path,
    dest: &Path,
) -> AppResult<()> {
    let staged = TempArtifact::ephemeral(working_dir(dest), DB_ARTIFACT_PREFIX, shredder)?;
    cipher.encrypt(passphrase, plaintext, staged.path())?;
    staged.persist(dest)?;
    debug!("Sealed journal to {:?}", dest);
    Ok(())
}

fn open_store(path: &Path, mode: SessionMode) -> AppResult<Connection> {
    let conn = match mode {
        SessionMode::Writable => Connection::open(path)?,
        SessionMode::ReadOnly => Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?,
    };
    Ok(conn)
}

/// Artifacts live next to the journal file itself, never in the shared
/// system temp directory.
fn working_dir(journal: &Path) -> &Path {
    match journal.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::errors::AppError;
    use std::fs;
    use std::path::PathBuf;

    /// Test cipher: "encryption" copies the file. Round-trip fidelity is all
    /// the session logic needs from its collaborator.
    struct CopyCipher;

    impl Cipher for CopyCipher {
        fn encrypt(&self, _: &SecretString, input: &Path, output: &Path) -> AppResult<()> {
            fs::copy(input, output)?;
            Ok(())
        }

        fn decrypt(&self, _: &SecretString, input: &Path, output: &Path) -> AppResult<()> {
            fs::copy(input, output)?;
            Ok(())
        }
    }

    /// Test cipher whose encrypt step always fails after writing partial
    /// output, simulating a mid-write cipher tool crash.
    struct FailingEncryptCipher;

    impl Cipher for FailingEncryptCipher {
        fn encrypt(&self, _: &SecretString, _: &Path, output: &Path) -> AppResult<()> {
            fs::write(output, b"partial garbage")?;
            Err(crate::errors::CryptoError::ToolFailed {
                operation: "Encryption",
                diagnostic: "simulated failure".to_string(),
            }
            .into())
        }

        fn decrypt(&self, _: &SecretString, input: &Path, output: &Path) -> AppResult<()> {
            fs::copy(input, output)?;
            Ok(())
        }
    }

    fn passphrase() -> SecretString {
        SecretString::new("test-passphrase".to_string())
    }

    fn shredder() -> Shredder {
        Shredder::new("shred")
    }

    /// Creates a "sealed" journal (CopyCipher, so plaintext sqlite) with the
    /// entries schema in place.
    fn seeded_journal(dir: &Path) -> PathBuf {
        let journal = dir.join("encrypted-journal");
        let working = dir.join("db.seed");
        {
            let conn = Connection::open(&working).unwrap();
            db::create_schema(&conn).unwrap();
            conn.close().unwrap();
        }
        fs::rename(&working, &journal).unwrap();
        journal
    }

    fn leftover_artifacts(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("db.") || n.starts_with("entry."))
            })
            .collect()
    }

    #[test]
    fn test_writable_session_persists_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let journal = seeded_journal(dir.path());

        with_session(
            &CopyCipher,
            &shredder(),
            &passphrase(),
            &journal,
            &journal,
            SessionMode::Writable,
            |conn| {
                conn.execute(
                    "INSERT INTO entries VALUES ('2024-01-01', '2024-01-01T12:00:00+00:00', 'hello')",
                    [],
                )?;
                Ok(())
            },
        )
        .unwrap();

        // A second session sees the committed row.
        let content = with_session(
            &CopyCipher,
            &shredder(),
            &passphrase(),
            &journal,
            &journal,
            SessionMode::ReadOnly,
            |conn| {
                let content: String = conn.query_row(
                    "SELECT content FROM entries WHERE created = '2024-01-01'",
                    [],
                    |row| row.get(0),
                )?;
                Ok(content)
            },
        )
        .unwrap();

        assert_eq!(content, "hello");
        assert!(leftover_artifacts(dir.path()).is_empty());
    }

    #[test]
    fn test_body_failure_leaves_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let journal = seeded_journal(dir.path());
        let before = fs::read(&journal).unwrap();

        let result: AppResult<()> = with_session(
            &CopyCipher,
            &shredder(),
            &passphrase(),
            &journal,
            &journal,
            SessionMode::Writable,
            |conn| {
                conn.execute(
                    "INSERT INTO entries VALUES ('2024-01-01', '2024-01-01T12:00:00+00:00', 'doomed')",
                    [],
                )?;
                Err(AppError::Usage("caller gave up".to_string()))
            },
        );

        assert!(result.is_err());
        assert_eq!(fs::read(&journal).unwrap(), before);
        assert!(leftover_artifacts(dir.path()).is_empty());
    }

    #[test]
    fn test_encrypt_failure_leaves_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let journal = seeded_journal(dir.path());
        let before = fs::read(&journal).unwrap();

        let result: AppResult<()> = with_session(
            &FailingEncryptCipher,
            &shredder(),
            &passphrase(),
            &journal,
            &journal,
            SessionMode::Writable,
            |conn| {
                conn.execute(
                    "INSERT INTO entries VALUES ('2024-01-01', '2024-01-01T12:00:00+00:00', 'x')",
                    [],
                )?;
                Ok(())
            },
        );

        assert!(matches!(result, Err(AppError::Crypto(_))));
        assert_eq!(fs::read(&journal).unwrap(), before);
        // The partial ciphertext and the working copy are both gone.
        assert!(leftover_artifacts(dir.path()).is_empty());
    }

    #[test]
    fn test_working_copy_erased_on_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let journal = seeded_journal(dir.path());

        let mut observed = PathBuf::new();
        with_session(
            &CopyCipher,
            &shredder(),
            &passphrase(),
            &journal,
            &journal,
            SessionMode::Writable,
            |conn| {
                observed = PathBuf::from(conn.path().unwrap());
                Ok(())
            },
        )
        .unwrap();
        assert!(!observed.exists());

        let mut observed = PathBuf::new();
        let _ = with_session(
            &CopyCipher,
            &shredder(),
            &passphrase(),
            &journal,
            &journal,
            SessionMode::Writable,
            |conn| {
                observed = PathBuf::from(conn.path().unwrap());
                Err::<(), _>(AppError::Usage("boom".to_string()))
            },
        );
        assert!(!observed.exists());
    }

    #[test]
    fn test_readonly_session_never_writes_back() {
        let dir = tempfile::tempdir().unwrap();
        let journal = seeded_journal(dir.path());
        let before = fs::read(&journal).unwrap();

        with_session(
            &CopyCipher,
            &shredder(),
            &passphrase(),
            &journal,
            &journal,
            SessionMode::ReadOnly,
            |conn| {
                let n: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
                assert_eq!(n, 0);
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(fs::read(&journal).unwrap(), before);
    }

    #[test]
    fn test_erase_failure_reaches_caller() {
        let dir = tempfile::tempdir().unwrap();
        let journal = seeded_journal(dir.path());
        let broken = Shredder::new("quire-no-such-shred-tool");

        let result: AppResult<()> = with_session(
            &CopyCipher,
            &broken,
            &passphrase(),
            &journal,
            &journal,
            SessionMode::ReadOnly,
            |_| Ok(()),
        );

        assert!(matches!(result, Err(AppError::Erase(_))));
        for leftover in leftover_artifacts(dir.path()) {
            fs::remove_file(leftover).unwrap();
        }
    }

    #[test]
    fn test_decrypt_failure_with_broken_shredder_keeps_root_cause() {
        struct FailingDecryptCipher;
        impl Cipher for FailingDecryptCipher {
            fn encrypt(&self, _: &SecretString, _: &Path, _: &Path) -> AppResult<()> {
                unreachable!("decrypt fails first")
            }
            fn decrypt(&self, _: &SecretString, _: &Path, _: &Path) -> AppResult<()> {
                Err(crate::errors::CryptoError::ToolFailed {
                    operation: "Decryption",
                    diagnostic: "bad passphrase".to_string(),
                }
                .into())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let journal = seeded_journal(dir.path());
        let broken = Shredder::new("quire-no-such-shred-tool");

        // The decrypt failure is still the reported error, but the erase is
        // attempted on this path too and the leftover copy stays visible.
        let result: AppResult<()> = with_session(
            &FailingDecryptCipher,
            &broken,
            &passphrase(),
            &journal,
            &journal,
            SessionMode::Writable,
            |_| Ok(()),
        );

        assert!(matches!(result, Err(AppError::Crypto(_))));
        let leftovers = leftover_artifacts(dir.path());
        assert_eq!(leftovers.len(), 1);
        for leftover in leftovers {
            fs::remove_file(leftover).unwrap();
        }
    }

    #[test]
    fn test_decrypt_failure_cleans_up_working_copy() {
        struct FailingDecryptCipher;
        impl Cipher for FailingDecryptCipher {
            fn encrypt(&self, _: &SecretString, _: &Path, _: &Path) -> AppResult<()> {
                unreachable!("decrypt fails first")
            }
            fn decrypt(&self, _: &SecretString, _: &Path, _: &Path) -> AppResult<()> {
                Err(crate::errors::CryptoError::ToolFailed {
                    operation: "Decryption",
                    diagnostic: "bad passphrase".to_string(),
                }
                .into())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let journal = seeded_journal(dir.path());

        let result: AppResult<()> = with_session(
            &FailingDecryptCipher,
            &shredder(),
            &passphrase(),
            &journal,
            &journal,
            SessionMode::Writable,
            |_| Ok(()),
        );

        assert!(matches!(result, Err(AppError::Crypto(_))));
        assert!(leftover_artifacts(dir.path()).is_empty());
    }
}

//! Bulk import of legacy per-entry encrypted files.
//!
//! Earlier journals kept one gpg-encrypted text file per day, named
//! `YYYY-MM-DD.gpg`. Migration folds a directory of those into the
//! relational journal in a single writable session: each file is decrypted
//! under the legacy passphrase into a scratch artifact, upserted, and the
//! scratch shredded. The destination is only written once, at session end,
//! so a failure partway through leaves it untouched.

use crate::constants::ENTRY_ARTIFACT_PREFIX;
use crate::crypto::gpg::Cipher;
use crate::crypto::passphrase;
use crate::crypto::session::{with_session, SessionMode};
use crate::crypto::shred::Shredder;
use crate::crypto::temp::TempArtifact;
use crate::db::entries;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local, NaiveDate, SecondsFormat};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Migrates every `*.gpg` file under `legacy_dir` into the journal at
/// `input`, sealing to `output`.
///
/// Prompts for two passphrases: the journal's own, then the one the legacy
/// files were encrypted under. Files are processed in name order, which for
/// date-stem names is chronological order.
pub fn migrate_directory(
    cipher: &dyn Cipher,
    shredder: &Shredder,
    input: &Path,
    output: &Path,
    legacy_dir: &Path,
) -> AppResult<()> {
    super::check_input_path(input)?;
    if !legacy_dir.is_dir() {
        return Err(AppError::Usage(format!(
            "Migration source {} is not a directory.",
            legacy_dir.display()
        )));
    }

    let files = legacy_files(legacy_dir)?;
    if files.is_empty() {
        return Err(AppError::Usage(format!(
            "No .gpg files found in {}.",
            legacy_dir.display()
        )));
    }

    let journal_passphrase = passphrase::existing_with_prompt("Journal passphrase: ")?;
    let legacy_passphrase = passphrase::existing_with_prompt("Legacy entries passphrase: ")?;

    let migrated = with_session(
        cipher,
        shredder,
        &journal_passphrase,
        input,
        output,
        SessionMode::Writable,
        |conn| {
            for file in &files {
                let created = date_from_stem(file)?;
                let modified = modified_from_mtime(file)?;

                let scratch =
                    TempArtifact::ephemeral(workdir(input), ENTRY_ARTIFACT_PREFIX, shredder)?;
                cipher.decrypt(&legacy_passphrase, file, scratch.path())?;
                let content = scratch.read_to_string()?;
                scratch.release()?;

                entries::upsert_entry(conn, created, &modified, &content)?;
                debug!("Migrated {:?} as {}", file, created);
            }
            Ok(files.len())
        },
    )?;

    info!("Migration complete: {} entries", migrated);
    println!("Migrated {} entries.", migrated);
    Ok(())
}

fn legacy_files(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("gpg")
        })
        .collect();
    files.sort();
    Ok(files)
}

/// The entry date is the filename stem, e.g. `2021-07-04.gpg`.
fn date_from_stem(file: &Path) -> AppResult<NaiveDate> {
    file.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse::<NaiveDate>().ok())
        .ok_or_else(|| {
            AppError::Usage(format!(
                "Legacy entry {} is not named YYYY-MM-DD.gpg.",
                file.display()
            ))
        })
}

/// The modified timestamp is the legacy file's mtime, in the local offset.
fn modified_from_mtime(file: &Path) -> AppResult<String> {
    let mtime = std::fs::metadata(file)?.modified()?;
    let local: DateTime<Local> = mtime.into();
    Ok(local.to_rfc3339_opts(SecondsFormat::Secs, false))
}

fn workdir(journal: &Path) -> &Path {
    match journal.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    }
}

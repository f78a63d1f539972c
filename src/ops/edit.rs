//! The new/edit/view flow: fetch, draft, edit, persist.

use crate::constants::ENTRY_ARTIFACT_PREFIX;
use crate::crypto::gpg::Cipher;
use crate::crypto::session::{with_session, SessionMode};
use crate::crypto::shred::Shredder;
use crate::crypto::temp::TempArtifact;
use crate::db::entries;
use crate::editor::{confirm_done, Editor};
use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDate, SecondsFormat};
use secrecy::SecretString;
use std::path::Path;
use tracing::{info, warn};

/// How the target entry date is chosen when the operator gives none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelector {
    /// A date given on the command line.
    Explicit(NaiveDate),
    /// The current local date (`new`).
    Today,
    /// The most recent entry in the store (`edit`/`view`); fails with
    /// `NoEntries` on an empty journal.
    Latest,
}

/// One new/edit/view invocation against the journal at `input`, sealed back
/// to `output` when the flow mutates.
pub struct EditRequest<'a> {
    pub cipher: &'a dyn Cipher,
    pub shredder: &'a Shredder,
    pub editor: &'a dyn Editor,
    pub input: &'a Path,
    pub output: &'a Path,
    pub date: DateSelector,
    pub readonly: bool,
}

/// Runs the full entry flow.
///
/// Two sessions bracket the editor: a read-only session fetches the existing
/// content so no plaintext journal sits on disk while the operator types,
/// and a second, writable session persists the draft afterwards. The draft
/// artifact is erased only once every later step has consumed it; if the
/// editor or the persistence session fails, the draft stays on disk and its
/// path is reported so the text is never silently lost.
pub fn edit_entry(request: EditRequest<'_>) -> AppResult<()> {
    super::check_input_path(request.input)?;
    let passphrase = crate::crypto::passphrase::existing()?;

    let (date, existing) = fetch_existing(&request, &passphrase)?;
    if request.readonly && existing.is_none() {
        return Err(AppError::Usage(format!("No entry exists for {}.", date)));
    }
    info!("Drafting entry for {}", date);

    let draft = TempArtifact::durable(
        workdir(request.input),
        ENTRY_ARTIFACT_PREFIX,
        request.shredder,
        existing.as_deref(),
    )?;
    let edited = readonly_guard(&request, &draft)
        .and_then(|()| request.editor.open(draft.path()))
        .and_then(|()| confirm_done())
        .and_then(|()| draft.read_to_string());
    let content = match edited {
        Ok(content) => content,
        Err(err) => {
            report_preserved_draft(draft.path());
            return Err(err);
        }
    };

    if !request.readonly {
        let persisted = persist_entry(&request, &passphrase, date, &content);
        if let Err(err) = persisted {
            report_preserved_draft(draft.path());
            return Err(err);
        }
    }

    draft.release()?;
    Ok(())
}

/// Opens a read-only session to resolve the target date and fetch the
/// current content for it, if any.
fn fetch_existing(
    request: &EditRequest<'_>,
    passphrase: &SecretString,
) -> AppResult<(NaiveDate, Option<String>)> {
    with_session(
        request.cipher,
        request.shredder,
        passphrase,
        request.input,
        request.output,
        SessionMode::ReadOnly,
        |conn| {
            let date = match request.date {
                DateSelector::Explicit(date) => date,
                DateSelector::Today => Local::now().date_naive(),
                DateSelector::Latest => entries::latest_entry_date(conn)?,
            };
            let existing = entries::entry_content(conn, date)?;
            Ok((date, existing))
        },
    )
}

/// Opens the writable session that upserts the edited content and seals the
/// journal back to the destination.
fn persist_entry(
    request: &EditRequest<'_>,
    passphrase: &SecretString,
    date: NaiveDate,
    content: &str,
) -> AppResult<()> {
    let modified = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
    with_session(
        request.cipher,
        request.shredder,
        passphrase,
        request.input,
        request.output,
        SessionMode::Writable,
        |conn| entries::upsert_entry(conn, date, &modified, content),
    )
}

/// Applies view-mode permissions to the draft. Runs inside the preserved
/// branch so a chmod failure reports the draft path like every other
/// post-draft failure.
fn readonly_guard(request: &EditRequest<'_>, draft: &TempArtifact) -> AppResult<()> {
    if request.readonly {
        draft.set_readonly()?;
    }
    Ok(())
}

fn report_preserved_draft(path: &Path) {
    warn!("Draft left on disk at {:?}", path);
    eprintln!("Your draft has been kept at {}.", path.display());
}

fn workdir(journal: &Path) -> &Path {
    match journal.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    }
}

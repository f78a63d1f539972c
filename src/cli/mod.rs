//! Command-line surface and dispatch.

use crate::config::Config;
use crate::constants::{APP_DESCRIPTION, APP_NAME};
use crate::crypto::gpg::GpgTool;
use crate::crypto::shred::Shredder;
use crate::editor::TemplateEditor;
use crate::errors::{AppError, AppResult};
use crate::ops::edit::{edit_entry, DateSelector, EditRequest};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// An encrypted journal using sqlite and gpg
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Read the journal from the given encrypted file
    #[clap(short = 'i', long, global = true)]
    pub input: Option<PathBuf>,

    /// Write the encrypted journal to the given file path
    #[clap(short = 'o', long, global = true)]
    pub output: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new empty journal
    Init,

    /// Create a journal entry
    New {
        /// Journal date. The format is YYYY-MM-DD. Default is today.
        entry: Option<String>,
    },

    /// Edit a journal entry
    Edit {
        /// Journal date. The format is YYYY-MM-DD. Default is latest.
        entry: Option<String>,
    },

    /// View a journal entry without modifying the journal
    View {
        /// Journal date. The format is YYYY-MM-DD. Default is latest.
        entry: Option<String>,
    },

    /// Import a directory of legacy per-day .gpg files
    Migrate {
        /// Directory holding YYYY-MM-DD.gpg files
        dir: PathBuf,
    },

    /// Debug: open a raw sqlite shell on the decrypted working copy
    Shell,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse_from(std::env::args())
    }
}

/// Parses an explicit entry date, distinguishing "none given" from
/// unparseable input.
pub fn parse_entry_date(entry: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match entry {
        None => Ok(None),
        Some(raw) => raw.parse::<NaiveDate>().map(Some).map_err(|_| {
            AppError::Usage(format!(
                "The format for entries is YYYY-MM-DD, got `{}`.",
                raw
            ))
        }),
    }
}

/// Dispatches a parsed command against the configured collaborators.
pub fn run(args: CliArgs, config: &Config) -> AppResult<()> {
    let cipher = GpgTool::new(&config.cipher_cmd);
    let shredder = Shredder::new(&config.shred_cmd);
    let editor = TemplateEditor::new(&config.editor);

    let input = args.input.unwrap_or_else(|| config.journal_path.clone());
    let output = args.output.unwrap_or_else(|| input.clone());

    match args.command {
        Command::Init => crate::ops::init::init_journal(&cipher, &shredder, &output),
        Command::New { entry } => edit_entry(EditRequest {
            cipher: &cipher,
            shredder: &shredder,
            editor: &editor,
            input: &input,
            output: &output,
            date: selector(entry.as_deref(), DateSelector::Today)?,
            readonly: false,
        }),
        Command::Edit { entry } => edit_entry(EditRequest {
            cipher: &cipher,
            shredder: &shredder,
            editor: &editor,
            input: &input,
            output: &output,
            date: selector(entry.as_deref(), DateSelector::Latest)?,
            readonly: false,
        }),
        Command::View { entry } => edit_entry(EditRequest {
            cipher: &cipher,
            shredder: &shredder,
            editor: &editor,
            input: &input,
            output: &output,
            date: selector(entry.as_deref(), DateSelector::Latest)?,
            readonly: true,
        }),
        Command::Migrate { dir } => {
            crate::ops::migrate::migrate_directory(&cipher, &shredder, &input, &output, &dir)
        }
        Command::Shell => {
            crate::ops::shell::store_shell(&cipher, &shredder, &config.sqlite_cmd, &input, &output)
        }
    }
}

fn selector(entry: Option<&str>, default: DateSelector) -> AppResult<DateSelector> {
    Ok(match parse_entry_date(entry)? {
        Some(date) => DateSelector::Explicit(date),
        None => default,
    })
}

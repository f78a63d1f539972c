//! Error handling utilities for the quire application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Nothing here is retried: every failure is terminal for the current
//! invocation, and recovery is the operator's next invocation against either
//! the untouched encrypted file or a deliberately preserved plaintext draft.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents specific error cases that can occur when running external
/// interactive commands (the editor, or the sqlite shell debug escape).
///
/// `CommandNotFound` is deliberately separate from the other variants: a
/// missing editor is a user-fixable condition and must be reported as such,
/// distinct from an editor that launched and then failed.
///
/// # Examples
///
/// ```
/// use quire::errors::EditorError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "command not found");
/// let error = EditorError::CommandNotFound {
///     command: "vim".to_string(),
///     source: io_error,
/// };
///
/// assert!(format!("{}", error).contains("not found"));
/// assert!(format!("{}", error).contains("vim"));
/// ```
#[derive(Debug, Error)]
pub enum EditorError {
    /// The configured command could not be found.
    #[error("Command '{command}' not found: {source}. Please check that it is installed and available in your PATH.")]
    CommandNotFound {
        /// The command that was not found
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The command exists but could not be spawned.
    #[error("Failed to execute '{command}': {source}")]
    ExecutionFailed {
        /// The command that failed to execute
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The command ran but exited with a non-zero status code.
    #[error("Command '{command}' exited with non-zero status code {status_code}")]
    NonZeroExit {
        /// The command that exited with a non-zero status
        command: String,
        /// The exit status code
        status_code: i32,
    },
}

/// Represents failures of the external symmetric cipher tool or of
/// passphrase collection.
///
/// A failed transform leaves no valid output: callers discard the
/// destination entirely and never merge partial ciphertext or plaintext.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The cipher tool binary could not be found.
    #[error("Cipher tool '{command}' not found: {source}. Is gpg installed?")]
    ToolNotFound {
        /// The cipher command that was not found
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The cipher tool exited non-zero (wrong passphrase, corrupted
    /// ciphertext, unreadable input). Carries the tool's own diagnostic.
    #[error("{operation} failed: {diagnostic}")]
    ToolFailed {
        /// Which transform was attempted ("Encryption" or "Decryption")
        operation: &'static str,
        /// The tool's stderr output
        diagnostic: String,
    },

    /// Reading the passphrase from the terminal failed.
    #[error("Failed to read passphrase: {0}")]
    PassphrasePrompt(String),

    /// An empty passphrase was supplied.
    #[error("Passphrase cannot be empty")]
    EmptyPassphrase,
}

/// Represents failures of the external secure-delete tool.
///
/// Erase failures are surfaced loudly rather than swallowed: leaving
/// plaintext behind silently would break the core promise of the tool,
/// so the process exits non-zero even when the primary operation succeeded.
#[derive(Debug, Error)]
pub enum EraseError {
    /// The secure-delete binary could not be found.
    #[error("Secure-delete tool '{command}' not found: {source}. Plaintext may remain at {path}.")]
    ToolNotFound {
        /// The secure-delete command that was not found
        command: String,
        /// The file that was supposed to be erased
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The secure-delete tool exited non-zero.
    #[error("Secure erase of {path} failed: {diagnostic}. Plaintext may remain on disk.")]
    ToolFailed {
        /// The file that was supposed to be erased
        path: PathBuf,
        /// The tool's stderr output
        diagnostic: String,
    },
}

/// Represents specific error cases that can occur when operating on the
/// entries relation of the working copy.
///
/// # Examples
///
/// ```
/// use quire::errors::StoreError;
///
/// let error = StoreError::NoEntries;
/// assert!(format!("{}", error).contains("No journal entries"));
/// ```
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite error from the working-copy store.
    #[error("Store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// More than one row exists for a `created` date. The unique constraint
    /// makes this unreachable; if it fires, it is a bug, never retried.
    #[error("Multiple entries found for {0}. This should never happen: it is a programming error and violates the sqlite unique constraint.")]
    DuplicateDate(chrono::NaiveDate),

    /// The journal exists but holds no entries yet.
    #[error("No journal entries exist; you must create one before editing it.")]
    NoEntries,
}

/// Represents all possible errors that can occur in the quire application.
///
/// This enum is the central error type used across the application, with
/// variants for different error categories. It uses `thiserror` for deriving
/// the `Error` trait implementation and formatted error messages.
///
/// # Examples
///
/// Converting from an IO error:
/// ```
/// use quire::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid user input: bad date format, missing or pre-existing journal
    /// file, mismatched passphrases at init. Reported before side effects.
    #[error("{0}")]
    Usage(String),

    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors when running the external editor or shell.
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// Errors from the external cipher tool or passphrase collection.
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    /// Errors from the external secure-delete tool.
    #[error("Erase error: {0}")]
    Erase(#[from] EraseError),

    /// Errors from the entries store in the working copy.
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Store(StoreError::Sqlite(err))
    }
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
pub type AppResult<T> = Result<T, AppError>;

//! Configuration management for the quire application.
//!
//! This module handles loading and validating configuration settings from
//! environment variables, with sensible defaults. Everything is resolved once
//! at process start and passed explicitly into the components that need it;
//! there are no global mutable defaults.
//!
//! # Environment Variables
//!
//! - `QUIRE_JOURNAL`: Path of the encrypted journal file (defaults to ./encrypted-journal)
//! - `QUIRE_EDITOR`: Editor command template with a `{filepath}` placeholder
//! - `EDITOR`: Fallback editor if QUIRE_EDITOR is not set (defaults to "vim {filepath}")
//! - `QUIRE_GPG`: Cipher tool command (defaults to "gpg")
//! - `QUIRE_SHRED`: Secure-delete tool command (defaults to "shred")
//! - `QUIRE_SQLITE`: Interactive sqlite shell command (defaults to "sqlite3")

use crate::constants::{
    DEFAULT_CIPHER_COMMAND, DEFAULT_EDITOR_TEMPLATE, DEFAULT_JOURNAL_PATH, DEFAULT_SHRED_COMMAND,
    DEFAULT_SQLITE_SHELL_COMMAND, EDITOR_FORBIDDEN_CHARS, ENV_VAR_EDITOR, ENV_VAR_QUIRE_EDITOR,
    ENV_VAR_QUIRE_GPG, ENV_VAR_QUIRE_JOURNAL, ENV_VAR_QUIRE_SHRED, ENV_VAR_QUIRE_SQLITE,
    FILEPATH_PLACEHOLDER, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Configuration for the quire application.
///
/// Holds the editor command template, the default journal file path, and the
/// names of the external tools the core invokes (cipher, secure-delete,
/// sqlite shell).
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use quire::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     editor: "nano {filepath}".to_string(),
///     journal_path: PathBuf::from("/path/to/encrypted-journal"),
///     ..Config::default()
/// };
/// ```
pub struct Config {
    /// Editor command template. `{filepath}` is replaced with the draft path;
    /// if the placeholder is absent, the path is appended as a final argument.
    pub editor: String,

    /// Default path of the encrypted journal file, used when a command does
    /// not override it with `-i`/`-o`.
    pub journal_path: PathBuf,

    /// Command invoked for symmetric encryption/decryption.
    pub cipher_cmd: String,

    /// Command invoked for secure file erasure.
    pub shred_cmd: String,

    /// Command invoked for the raw sqlite shell debug escape.
    pub sqlite_cmd: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("editor", &REDACTED_PLACEHOLDER)
            .field("journal_path", &REDACTED_PLACEHOLDER)
            .field("cipher_cmd", &self.cipher_cmd)
            .field("shred_cmd", &self.shred_cmd)
            .field("sqlite_cmd", &self.sqlite_cmd)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            editor: DEFAULT_EDITOR_TEMPLATE.to_string(),
            journal_path: PathBuf::from(DEFAULT_JOURNAL_PATH),
            cipher_cmd: DEFAULT_CIPHER_COMMAND.to_string(),
            shred_cmd: DEFAULT_SHRED_COMMAND.to_string(),
            sqlite_cmd: DEFAULT_SQLITE_SHELL_COMMAND.to_string(),
        }
    }
}

impl Config {
    /// Validates an editor command template.
    ///
    /// The template must be non-empty, must not contain shell metacharacters
    /// (the template is split on whitespace and executed directly, never
    /// through a shell, so metacharacters would be silently literal), and may
    /// contain the `{filepath}` placeholder at most once.
    fn validate_editor_template(template: &str) -> AppResult<&str> {
        if template.trim().is_empty() {
            return Err(AppError::Config(
                "Editor command cannot be empty".to_string(),
            ));
        }

        for &ch in EDITOR_FORBIDDEN_CHARS.iter() {
            if template.contains(ch) {
                return Err(AppError::Config(format!(
                    "Editor command cannot contain shell metacharacters: '{}'. Use a wrapper script instead",
                    ch
                )));
            }
        }

        if template.matches(FILEPATH_PLACEHOLDER).count() > 1 {
            return Err(AppError::Config(format!(
                "Editor command may contain the {} placeholder at most once",
                FILEPATH_PLACEHOLDER
            )));
        }

        Ok(template)
    }

    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the journal path expansion fails or the
    /// editor template fails validation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use quire::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Cipher tool: {}", config.cipher_cmd),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        let editor_raw = env::var(ENV_VAR_QUIRE_EDITOR)
            .or_else(|_| env::var(ENV_VAR_EDITOR))
            .unwrap_or_else(|_| DEFAULT_EDITOR_TEMPLATE.to_string());
        let editor = Config::validate_editor_template(&editor_raw)?.to_string();

        let journal_raw =
            env::var(ENV_VAR_QUIRE_JOURNAL).unwrap_or_else(|_| DEFAULT_JOURNAL_PATH.to_string());
        let journal_path = shellexpand::full(&journal_raw)
            .map_err(|e| AppError::Config(format!("Failed to expand journal path: {}", e)))?
            .into_owned();

        let cipher_cmd =
            env::var(ENV_VAR_QUIRE_GPG).unwrap_or_else(|_| DEFAULT_CIPHER_COMMAND.to_string());
        let shred_cmd =
            env::var(ENV_VAR_QUIRE_SHRED).unwrap_or_else(|_| DEFAULT_SHRED_COMMAND.to_string());
        let sqlite_cmd = env::var(ENV_VAR_QUIRE_SQLITE)
            .unwrap_or_else(|_| DEFAULT_SQLITE_SHELL_COMMAND.to_string());

        Ok(Config {
            editor,
            journal_path: PathBuf::from(journal_path),
            cipher_cmd,
            shred_cmd,
            sqlite_cmd,
        })
    }
}

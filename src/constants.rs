//! Constants used throughout the application.
//!
//! This module contains all constants used in the Quire application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "quire";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "An encrypted journal using sqlite and gpg";

// Configuration Keys & Environment Variables
/// Environment variable for the journal file path.
pub const ENV_VAR_QUIRE_JOURNAL: &str = "QUIRE_JOURNAL";
/// Environment variable for the preferred editor command template.
pub const ENV_VAR_QUIRE_EDITOR: &str = "QUIRE_EDITOR";
/// Standard environment variable for specifying the default editor.
pub const ENV_VAR_EDITOR: &str = "EDITOR";
/// Environment variable overriding the cipher tool command.
pub const ENV_VAR_QUIRE_GPG: &str = "QUIRE_GPG";
/// Environment variable overriding the secure-delete tool command.
pub const ENV_VAR_QUIRE_SHRED: &str = "QUIRE_SHRED";
/// Environment variable overriding the interactive sqlite shell command.
pub const ENV_VAR_QUIRE_SQLITE: &str = "QUIRE_SQLITE";
/// Environment variable supplying a passphrase for non-interactive testing.
/// Setting it also suppresses the "press Enter when done" editor confirmation.
pub const ENV_VAR_TEST_PASSPHRASE: &str = "QUIRE_TEST_PASSPHRASE";
/// Environment variable often used to indicate a Continuous Integration environment.
pub const ENV_VAR_CI: &str = "CI";

// Defaults
/// Default editor command template. `{filepath}` is replaced with the draft path.
pub const DEFAULT_EDITOR_TEMPLATE: &str = "vim {filepath}";
/// Default path of the encrypted journal file.
pub const DEFAULT_JOURNAL_PATH: &str = "./encrypted-journal";
/// Default command for the external symmetric cipher tool.
pub const DEFAULT_CIPHER_COMMAND: &str = "gpg";
/// Default command for the external secure-delete tool.
pub const DEFAULT_SHRED_COMMAND: &str = "shred";
/// Default command for the interactive sqlite shell (debug escape).
pub const DEFAULT_SQLITE_SHELL_COMMAND: &str = "sqlite3";

// Transient artifacts
/// Filename prefix marking a decrypted working copy of the journal store.
pub const DB_ARTIFACT_PREFIX: &str = "db.";
/// Filename prefix marking a plaintext entry draft.
pub const ENTRY_ARTIFACT_PREFIX: &str = "entry.";
/// Placeholder substituted with the draft path in the editor template.
pub const FILEPATH_PLACEHOLDER: &str = "{filepath}";

// Validation
/// Characters forbidden in editor command templates for security reasons.
pub const EDITOR_FORBIDDEN_CHARS: &[char] =
    &['|', '&', ';', '$', '(', ')', '`', '\\', '<', '>', '\'', '"'];
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";

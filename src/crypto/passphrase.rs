//! Passphrase acquisition for the journal cipher.
//!
//! Prompts read from the terminal without echo. Automation (tests, CI) can
//! bypass the prompt by exporting `QUIRE_TEST_PASSPHRASE`, in which case its
//! value is used verbatim for every prompt in the process.

use crate::constants::ENV_VAR_TEST_PASSPHRASE;
use crate::errors::{AppError, AppResult, CryptoError};
use secrecy::{ExposeSecret, SecretString};

/// Prompts for the passphrase of an existing journal.
pub fn existing() -> AppResult<SecretString> {
    prompt("Journal passphrase: ")
}

/// Like [`existing`] but with a caller-supplied prompt, for flows that need
/// to distinguish between several passphrases (migration asks for both the
/// old journal's and the new one's).
pub fn existing_with_prompt(label: &str) -> AppResult<SecretString> {
    prompt(label)
}

/// Prompts twice for a brand-new passphrase and insists the two entries
/// match, so a typo cannot silently seal the journal under an unknowable
/// key.
pub fn new_with_confirmation() -> AppResult<SecretString> {
    if let Some(injected) = injected() {
        return injected;
    }

    let first = read_secret("New journal passphrase: ")?;
    if first.expose_secret().is_empty() {
        return Err(CryptoError::EmptyPassphrase.into());
    }
    let second = read_secret("Confirm passphrase: ")?;
    if first.expose_secret() != second.expose_secret() {
        // Bad input, not a cipher failure. Nothing has been written yet.
        return Err(AppError::Usage(
            "Passphrases don't match, not creating journal file.".to_string(),
        ));
    }
    Ok(first)
}

fn prompt(label: &str) -> AppResult<SecretString> {
    if let Some(injected) = injected() {
        return injected;
    }

    let secret = read_secret(label)?;
    if secret.expose_secret().is_empty() {
        return Err(CryptoError::EmptyPassphrase.into());
    }
    Ok(secret)
}

fn read_secret(label: &str) -> AppResult<SecretString> {
    let raw = rpassword::prompt_password(label)
        .map_err(|e| CryptoError::PassphrasePrompt(e.to_string()))?;
    Ok(SecretString::new(raw))
}

/// Test escape hatch. An empty injected value is still rejected, matching
/// the interactive rule.
fn injected() -> Option<AppResult<SecretString>> {
    let value = std::env::var(ENV_VAR_TEST_PASSPHRASE).ok()?;
    if value.is_empty() {
        return Some(Err(CryptoError::EmptyPassphrase.into()));
    }
    Some(Ok(SecretString::new(value)))
}

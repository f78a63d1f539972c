//! External symmetric cipher tool invocation.
//!
//! Encryption and decryption are delegated to gpg running in batch mode with
//! AES-256 symmetric encryption. The passphrase is written to the child's
//! stdin (`--passphrase-fd 0`); it never appears on the command line or in
//! the environment, and loopback pinentry keeps gpg from spawning a GUI
//! prompt.

use crate::errors::{AppResult, CryptoError};
use secrecy::{ExposeSecret, SecretString};
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Interface to the symmetric cipher collaborator.
///
/// A successful transform leaves the destination fully written and the source
/// untouched. A failed transform produces no valid output: callers discard
/// the destination entirely, never merge partial data.
pub trait Cipher {
    /// Encrypts `plaintext` to `ciphertext` under `passphrase`.
    fn encrypt(
        &self,
        passphrase: &SecretString,
        plaintext: &Path,
        ciphertext: &Path,
    ) -> AppResult<()>;

    /// Decrypts `ciphertext` to `plaintext` under `passphrase`.
    fn decrypt(
        &self,
        passphrase: &SecretString,
        ciphertext: &Path,
        plaintext: &Path,
    ) -> AppResult<()>;
}

/// Production cipher: the gpg command-line tool.
#[derive(Debug, Clone)]
pub struct GpgTool {
    command: String,
}

impl GpgTool {
    pub fn new(command: impl Into<String>) -> Self {
        GpgTool {
            command: command.into(),
        }
    }

    /// Runs one gpg transform, feeding the passphrase through stdin.
    ///
    /// Blocks until the child exits and inspects its status; a non-zero exit
    /// is an unrecoverable step failure carrying gpg's own diagnostic.
    fn run_transform(
        &self,
        operation: &'static str,
        passphrase: &SecretString,
        mode_args: &[&str],
        input: &Path,
        output: &Path,
    ) -> AppResult<()> {
        debug!("{} {:?} -> {:?}", operation, input, output);

        let mut child = Command::new(&self.command)
            .args([
                "--batch",
                "--yes",
                "--quiet",
                "--pinentry-mode",
                "loopback",
                // Keep the journal passphrase out of the agent's cache.
                "--no-symkey-cache",
                "--passphrase-fd",
                "0",
                "--output",
            ])
            .arg(output)
            .args(mode_args)
            .arg(input)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => CryptoError::ToolNotFound {
                    command: self.command.clone(),
                    source: e,
                },
                _ => CryptoError::ToolFailed {
                    operation,
                    diagnostic: e.to_string(),
                },
            })?;

        // The child reads the passphrase from fd 0 before processing input.
        {
            let mut stdin = child.stdin.take().ok_or(CryptoError::ToolFailed {
                operation,
                diagnostic: "failed to open stdin of cipher tool".to_string(),
            })?;
            stdin
                .write_all(passphrase.expose_secret().as_bytes())
                .and_then(|_| stdin.write_all(b"\n"))
                .map_err(|e| CryptoError::ToolFailed {
                    operation,
                    diagnostic: format!("failed to transmit passphrase: {}", e),
                })?;
        }

        let output_info = child.wait_with_output().map_err(|e| CryptoError::ToolFailed {
            operation,
            diagnostic: e.to_string(),
        })?;

        if !output_info.status.success() {
            return Err(CryptoError::ToolFailed {
                operation,
                diagnostic: String::from_utf8_lossy(&output_info.stderr)
                    .trim()
                    .to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl Cipher for GpgTool {
    fn encrypt(
        &self,
        passphrase: &SecretString,
        plaintext: &Path,
        ciphertext: &Path,
    ) -> AppResult<()> {
        self.run_transform(
            "Encryption",
            passphrase,
            &["--symmetric", "--cipher-algo", "AES256"],
            plaintext,
            ciphertext,
        )
    }

    fn decrypt(
        &self,
        passphrase: &SecretString,
        ciphertext: &Path,
        plaintext: &Path,
    ) -> AppResult<()> {
        self.run_transform("Decryption", passphrase, &["--decrypt"], ciphertext, plaintext)
    }
}

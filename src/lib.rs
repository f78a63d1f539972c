/*!
# Quire

Quire is an encrypted single-user journal. Entries are keyed by date and kept
in a sqlite store that only ever touches disk inside an encrypted session:
the journal file is decrypted to a working copy next to itself, operated on,
re-encrypted in full on success, and the working copy is securely shredded
on every exit path.

## Architecture

- `cli`: Command-line surface (clap) and dispatch
- `config`: Environment-driven configuration
- `constants`: Shared names, defaults, and prefixes
- `crypto`: The encrypted session and its collaborators (gpg cipher,
  secure shredding, temp artifacts, passphrase prompts)
- `db`: Schema and queries for the entries relation
- `editor`: External editor invocation behind a trait
- `errors`: Error types and the `AppResult` alias
- `ops`: One module per journal operation (init, new/edit/view, migrate,
  shell)

## Usage Example

```rust,no_run
use quire::cli::{self, CliArgs};
use quire::Config;

fn main() -> quire::AppResult<()> {
    let config = Config::load()?;
    let args = CliArgs::parse_args();
    cli::run(args, &config)
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Encrypted session lifecycle and external crypto tools
pub mod crypto;
/// Entries store inside the working copy
pub mod db;
/// External editor abstraction
pub mod editor;
/// Error types and utilities for error handling
pub mod errors;
/// Journal operations
pub mod ops;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};

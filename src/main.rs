/*!
# Quire - An Encrypted Journal

Command-line tool for keeping a date-keyed journal inside a single
symmetrically encrypted file. The journal is only ever decrypted into a
short-lived working copy beside the journal file, and that working copy is
securely shredded before the process exits.

## Usage

```text
quire [-i <file>] [-o <file>] <COMMAND>

Commands:
  init     Create a new empty journal
  new      Create a journal entry (default date: today)
  edit     Edit a journal entry (default date: latest)
  view     View a journal entry without modifying the journal
  migrate  Import a directory of legacy per-day .gpg files
  shell    Debug: open a raw sqlite shell on the working copy
```

## Configuration

- `QUIRE_JOURNAL`: Path of the encrypted journal (defaults to ./encrypted-journal)
- `QUIRE_EDITOR` or `EDITOR`: Editor command template with `{filepath}`
- `QUIRE_GPG`, `QUIRE_SHRED`, `QUIRE_SQLITE`: External tool commands
*/

use quire::cli::{self, CliArgs};
use quire::Config;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    // Warnings and erase failures must show up even without RUST_LOG set.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run() -> quire::AppResult<()> {
    let args = CliArgs::parse_args();
    debug!("CLI arguments: {:?}", args);

    let config = Config::load()?;
    debug!("Configuration loaded: {:?}", config);

    cli::run(args, &config)?;
    info!("Done");
    Ok(())
}

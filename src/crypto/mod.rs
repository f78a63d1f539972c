//! Encrypted-session lifecycle: cipher tool invocation, transient plaintext
//! artifacts, secure erasure, and the decrypt-operate-reencrypt session.
//!
//! # Module Structure
//!
//! - `gpg`: the external symmetric cipher tool behind the [`Cipher`] trait
//! - `shred`: best-effort secure erasure of transient plaintext files
//! - `temp`: scoped acquisition of uniquely named plaintext artifacts
//! - `session`: the decrypt → operate → (re-encrypt) → shred cycle
//! - `passphrase`: masked interactive passphrase collection

pub mod gpg;
pub mod passphrase;
pub mod session;
pub mod shred;
pub mod temp;

pub use gpg::{Cipher, GpgTool};
pub use session::{with_session, SessionMode};
pub use shred::Shredder;
pub use temp::TempArtifact;

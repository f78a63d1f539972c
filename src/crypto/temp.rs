//! Scoped acquisition of transient plaintext artifacts.
//!
//! Artifacts are uniquely named files inside the journal's own directory,
//! never the system-wide temp directory: that keeps them visible and
//! cleanable next to the encrypted file, and co-located for atomic rename.
//! Their filename prefix (`db.` / `entry.`) marks them as erasable and is
//! checked by the shredder before any overwrite-and-unlink.

use crate::crypto::shred::Shredder;
use crate::errors::{AppError, AppResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// A uniquely named transient file in the journal's working directory.
///
/// Two flavors:
/// - *ephemeral* artifacts are shredded when the scope exits, on every exit
///   path. Callers should shred explicitly via [`release`](Self::release) so
///   erase failures surface; the `Drop` impl is a best-effort fallback for
///   early error returns.
/// - *durable* artifacts survive scope exit so their content can be handed
///   to an external interactive process and re-read afterwards. The caller
///   either releases them explicitly or deliberately leaves them behind.
pub struct TempArtifact {
    path: PathBuf,
    shredder: Shredder,
    durable: bool,
    released: bool,
}

impl TempArtifact {
    /// Acquires an ephemeral artifact, shredded on scope exit.
    pub fn ephemeral(dir: &Path, prefix: &str, shredder: &Shredder) -> AppResult<Self> {
        Self::create(dir, prefix, shredder, false, None)
    }

    /// Acquires a durable artifact, optionally pre-populated with content.
    ///
    /// The artifact persists across the scope boundary; the caller owns its
    /// release (or its deliberate preservation on error paths).
    pub fn durable(
        dir: &Path,
        prefix: &str,
        shredder: &Shredder,
        initial_content: Option<&str>,
    ) -> AppResult<Self> {
        Self::create(dir, prefix, shredder, true, initial_content)
    }

    fn create(
        dir: &Path,
        prefix: &str,
        shredder: &Shredder,
        durable: bool,
        initial_content: Option<&str>,
    ) -> AppResult<Self> {
        let mut file = tempfile::Builder::new().prefix(prefix).tempfile_in(dir)?;

        if let Some(content) = initial_content {
            file.write_all(content.as_bytes())?;
            file.flush()?;
        }

        // Detach from tempfile's auto-unlink: deletion here means shredding,
        // not a plain unlink.
        let (_handle, path) = file.keep().map_err(|e| AppError::Io(e.error))?;
        debug!("Acquired temp artifact {:?} (durable={})", path, durable);

        Ok(TempArtifact {
            path,
            shredder: shredder.clone(),
            durable,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restricts the artifact to owner-read-only, before any external
    /// process gets to see it.
    pub fn set_readonly(&self) -> AppResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o400))?;
        }
        #[cfg(not(unix))]
        {
            let mut perms = fs::metadata(&self.path)?.permissions();
            perms.set_readonly(true);
            fs::set_permissions(&self.path, perms)?;
        }
        Ok(())
    }

    /// Reads the artifact's full content back.
    pub fn read_to_string(&self) -> AppResult<String> {
        Ok(fs::read_to_string(&self.path)?)
    }

    /// Shreds the artifact, surfacing erase failures to the caller.
    pub fn release(mut self) -> AppResult<()> {
        self.released = true;
        self.shredder.erase(&self.path)
    }

    /// Atomically renames the artifact onto `dest` instead of erasing it.
    ///
    /// Both paths live in the same directory, so the rename either fully
    /// replaces `dest` or leaves it untouched.
    pub fn persist(mut self, dest: &Path) -> AppResult<()> {
        fs::rename(&self.path, dest)?;
        self.released = true;
        debug!("Persisted temp artifact to {:?}", dest);
        Ok(())
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if self.released || self.durable {
            return;
        }
        if let Err(err) = self.shredder.erase(&self.path) {
            error!("Failed to shred {:?} during cleanup: {}", self.path, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shredder() -> Shredder {
        Shredder::new("shred")
    }

    #[test]
    fn test_ephemeral_artifact_shredded_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path;
        {
            let artifact = TempArtifact::ephemeral(dir.path(), "db.", &shredder()).unwrap();
            path = artifact.path().to_path_buf();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_durable_artifact_survives_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path;
        {
            let artifact =
                TempArtifact::durable(dir.path(), "entry.", &shredder(), Some("draft")).unwrap();
            path = artifact.path().to_path_buf();
        }
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "draft");
    }

    #[test]
    fn test_prepopulated_content_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let artifact =
            TempArtifact::durable(dir.path(), "entry.", &shredder(), Some("existing text"))
                .unwrap();
        assert_eq!(artifact.read_to_string().unwrap(), "existing text");
        artifact.release().unwrap();
    }

    #[test]
    fn test_empty_when_no_content_supplied() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = TempArtifact::durable(dir.path(), "entry.", &shredder(), None).unwrap();
        assert_eq!(artifact.read_to_string().unwrap(), "");
        artifact.release().unwrap();
    }

    #[test]
    fn test_release_surfaces_erase_failure() {
        let dir = tempfile::tempdir().unwrap();
        let broken = Shredder::new("quire-no-such-shred-tool");
        let artifact = TempArtifact::ephemeral(dir.path(), "db.", &broken).unwrap();
        let path = artifact.path().to_path_buf();

        assert!(artifact.release().is_err());
        // Cleanup with a working shredder so the tempdir can be removed.
        shredder().erase(&path).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_set_readonly_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let artifact =
            TempArtifact::durable(dir.path(), "entry.", &shredder(), Some("view me")).unwrap();
        artifact.set_readonly().unwrap();

        let mode = fs::metadata(artifact.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o400);
        artifact.release().unwrap();
    }

    #[test]
    fn test_persist_renames_instead_of_erasing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("encrypted-journal");
        let artifact =
            TempArtifact::durable(dir.path(), "db.", &shredder(), Some("ciphertext")).unwrap();
        let staged_path = artifact.path().to_path_buf();

        artifact.persist(&dest).unwrap();
        assert!(!staged_path.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "ciphertext");
    }

    #[test]
    fn test_unique_names_for_concurrent_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let a = TempArtifact::ephemeral(dir.path(), "db.", &shredder()).unwrap();
        let b = TempArtifact::ephemeral(dir.path(), "db.", &shredder()).unwrap();
        assert_ne!(a.path(), b.path());
    }
}

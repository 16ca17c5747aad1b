//! File-backed credential store.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use deadbolt_core::AccessCode;
use deadbolt_core::constants::PIN_LENGTH;

use crate::error::StoreResult;
use crate::{CredentialStore, ERASED_BYTE};

/// Credential store persisting the record to a single file.
///
/// The file holds exactly [`PIN_LENGTH`] raw ASCII digit bytes. A
/// missing or short file reads as erased cells, which provisioning
/// treats as an uninitialized store. Writes call `sync_all` before
/// returning, so a completed `save` survives power loss.
///
/// # Examples
///
/// ```no_run
/// use deadbolt_store::{CredentialStore, FileCredentialStore, provision};
///
/// let mut store = FileCredentialStore::new("/var/lib/deadbolt/credential");
/// let code = provision(&mut store)?;
/// # Ok::<(), deadbolt_store::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store backed by the file at `path`.
    ///
    /// The file is not touched until the first `load` or `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&mut self) -> StoreResult<[u8; PIN_LENGTH]> {
        let mut record = [ERASED_BYTE; PIN_LENGTH];
        match fs::read(&self.path) {
            Ok(bytes) => {
                for (cell, byte) in record.iter_mut().zip(bytes) {
                    *cell = byte;
                }
                Ok(record)
            }
            // A store that has never been written reads as erased.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(record),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, code: &AccessCode) -> StoreResult<()> {
        let mut file = File::create(&self.path)?;
        file.write_all(code.as_bytes())?;
        // Durable before the caller proceeds; see the crate docs.
        file.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision;
    use deadbolt_core::constants::DEFAULT_PIN;

    fn store_in(dir: &tempfile::TempDir) -> FileCredentialStore {
        FileCredentialStore::new(dir.path().join("credential"))
    }

    #[test]
    fn test_missing_file_reads_erased() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        assert_eq!(store.load().unwrap(), [ERASED_BYTE; PIN_LENGTH]);
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let code: AccessCode = "425397".parse().unwrap();
        store.save(&code).unwrap();

        assert_eq!(&store.load().unwrap(), code.as_bytes());
    }

    #[test]
    fn test_short_file_reads_partially_erased() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credential");
        fs::write(&path, b"12").unwrap();

        let mut store = FileCredentialStore::new(&path);
        let record = store.load().unwrap();
        assert_eq!(&record[..2], b"12");
        assert_eq!(record[2..], [ERASED_BYTE; PIN_LENGTH - 2]);
    }

    #[test]
    fn test_provision_reseeds_corrupted_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credential");
        fs::write(&path, b"12\xFF456").unwrap();

        let mut store = FileCredentialStore::new(&path);
        let code = provision(&mut store).unwrap();

        assert_eq!(code.as_str(), DEFAULT_PIN);
        assert_eq!(fs::read(&path).unwrap(), DEFAULT_PIN.as_bytes());
    }

    #[test]
    fn test_provision_keeps_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credential");
        fs::write(&path, b"864200").unwrap();

        let mut store = FileCredentialStore::new(&path);
        let code = provision(&mut store).unwrap();

        assert_eq!(code.as_str(), "864200");
    }
}

//! In-memory credential store for tests and demos.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use deadbolt_core::AccessCode;
use deadbolt_core::constants::PIN_LENGTH;

use crate::error::{StoreError, StoreResult};
use crate::{CredentialStore, ERASED_BYTE};

/// Volatile credential store backed by a shared in-memory record.
///
/// Clones share the same record, so a clone kept by a test acts as a
/// probe into what the controller persisted. Write failures can be
/// injected to exercise the fatal-persistence path.
///
/// # Examples
///
/// ```
/// use deadbolt_store::{CredentialStore, MemoryCredentialStore};
/// use deadbolt_core::AccessCode;
///
/// let mut store = MemoryCredentialStore::new();
/// let probe = store.clone();
///
/// let code: AccessCode = "271828".parse().unwrap();
/// store.save(&code).unwrap();
///
/// assert_eq!(probe.raw(), *b"271828");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryCredentialStore {
    record: Arc<Mutex<[u8; PIN_LENGTH]>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryCredentialStore {
    /// Create an erased store (every cell reads [`ERASED_BYTE`]).
    #[must_use]
    pub fn new() -> Self {
        Self::with_record([ERASED_BYTE; PIN_LENGTH])
    }

    /// Create a store holding the given raw record.
    ///
    /// The record is deliberately unvalidated so tests can model
    /// corrupted storage.
    #[must_use]
    pub fn with_record(record: [u8; PIN_LENGTH]) -> Self {
        Self {
            record: Arc::new(Mutex::new(record)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent `save` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Inspect the raw record without going through the trait.
    #[must_use]
    pub fn raw(&self) -> [u8; PIN_LENGTH] {
        *self.record.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&mut self) -> StoreResult<[u8; PIN_LENGTH]> {
        Ok(self.raw())
    }

    fn save(&mut self, code: &AccessCode) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected(
                "injected write failure".to_string(),
            ));
        }
        let mut record = self.record.lock().unwrap_or_else(|e| e.into_inner());
        record.copy_from_slice(code.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_reads_erased() {
        let mut store = MemoryCredentialStore::new();
        assert_eq!(store.load().unwrap(), [ERASED_BYTE; PIN_LENGTH]);
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let mut store = MemoryCredentialStore::new();
        let code: AccessCode = "123456".parse().unwrap();

        store.save(&code).unwrap();
        assert_eq!(&store.load().unwrap(), code.as_bytes());
    }

    #[test]
    fn test_clone_shares_record() {
        let mut store = MemoryCredentialStore::new();
        let probe = store.clone();

        let code: AccessCode = "987654".parse().unwrap();
        store.save(&code).unwrap();

        assert_eq!(probe.raw(), *b"987654");
    }

    #[test]
    fn test_injected_write_failure() {
        let mut store = MemoryCredentialStore::new();
        store.set_fail_writes(true);

        let code: AccessCode = "123456".parse().unwrap();
        assert!(matches!(
            store.save(&code),
            Err(StoreError::WriteRejected(_))
        ));

        // The record is untouched by the failed write.
        assert_eq!(store.raw(), [ERASED_BYTE; PIN_LENGTH]);

        store.set_fail_writes(false);
        store.save(&code).unwrap();
        assert_eq!(store.raw(), *b"123456");
    }
}

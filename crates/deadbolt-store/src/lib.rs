//! Durable credential storage for the Deadbolt PIN lock controller.
//!
//! The persisted credential is a single fixed-length record: exactly
//! [`PIN_LENGTH`] raw ASCII digit bytes at a fixed location, no framing
//! and no checksum. Any non-digit byte read at boot means the record is
//! uninitialized or corrupted, and provisioning reseeds it with the
//! factory default code.
//!
//! # Write Semantics
//!
//! [`CredentialStore::save`] blocks until the write is durable. It is
//! only ever invoked from the controller's own control path (boot
//! provisioning and the completion of a PIN change), never from the
//! time-critical scan tick, so no store-level locking is needed. A
//! failed write propagates to the caller and stops the controller;
//! running with an unpersisted credential is worse than stopping.
//!
//! # Examples
//!
//! ```
//! use deadbolt_store::{CredentialStore, MemoryCredentialStore, provision};
//! use deadbolt_core::constants::DEFAULT_PIN;
//!
//! // A blank (erased) store reseeds to the factory default at boot.
//! let mut store = MemoryCredentialStore::new();
//! let code = provision(&mut store).unwrap();
//! assert_eq!(code.as_str(), DEFAULT_PIN);
//!
//! // The reseeded value is written back, not just returned.
//! assert_eq!(&store.load().unwrap(), DEFAULT_PIN.as_bytes());
//! ```

pub mod error;

mod file;
mod memory;

pub use error::{StoreError, StoreResult};
pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

use deadbolt_core::AccessCode;
use deadbolt_core::constants::PIN_LENGTH;

/// Value of a never-programmed storage cell.
///
/// Short or missing backing records read as this byte, which fails
/// digit validation and triggers a reseed.
pub const ERASED_BYTE: u8 = 0xFF;

/// Durable fixed-length credential record.
pub trait CredentialStore: Send {
    /// Read the raw record.
    ///
    /// Always returns [`PIN_LENGTH`] bytes; cells the backing store has
    /// never written read as [`ERASED_BYTE`]. No validation happens
    /// here; use [`AccessCode::from_bytes`] or [`provision`].
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load(&mut self) -> StoreResult<[u8; PIN_LENGTH]>;

    /// Overwrite the record with `code`, blocking until durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or cannot be made durable.
    fn save(&mut self, code: &AccessCode) -> StoreResult<()>;
}

/// Boot-time provisioning: load the credential, reseeding if invalid.
///
/// Loads the record and validates it (every byte an ASCII digit). On
/// validation failure the factory default code is written back to the
/// store and returned.
///
/// # Errors
///
/// Returns an error if the store cannot be read, or if the reseed write
/// fails. An unreadable or unwritable credential store is fatal at
/// boot.
pub fn provision<S: CredentialStore>(store: &mut S) -> StoreResult<AccessCode> {
    let record = store.load()?;
    match AccessCode::from_bytes(&record) {
        Ok(code) => Ok(code),
        Err(reason) => {
            tracing::warn!(%reason, "Stored credential invalid, reseeding factory default");
            let code = AccessCode::factory_default();
            store.save(&code)?;
            Ok(code)
        }
    }
}

use thiserror::Error;

use deadbolt_hardware::HardwareError;
use deadbolt_store::StoreError;

/// Errors that stop the device controller.
///
/// Both variants are fatal by policy: the loop does not keep running
/// against hardware or storage it can no longer trust.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Credential persistence failed
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// A display or actuator operation failed
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),
}

/// Specialized result type for controller operations
pub type DeviceResult<T> = Result<T, DeviceError>;

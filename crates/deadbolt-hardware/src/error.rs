//! Error types for hardware operations.
//!
//! This module defines error types specific to hardware device operations:
//! disconnections, out-of-range display addressing, and unsupported
//! operations on devices that lack an optional capability.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Display cursor addressed outside the panel.
    #[error("Cursor ({line}, {column}) outside a {lines}x{columns} display")]
    CursorOutOfRange {
        line: usize,
        column: usize,
        lines: usize,
        columns: usize,
    },

    /// Operation is not supported by this device.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// Invalid data received from device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_error() {
        let error = HardwareError::disconnected("Keypad");
        assert!(matches!(error, HardwareError::Disconnected { .. }));
        assert_eq!(error.to_string(), "Device disconnected: Keypad");
    }

    #[test]
    fn test_cursor_out_of_range_display() {
        let error = HardwareError::CursorOutOfRange {
            line: 2,
            column: 0,
            lines: 2,
            columns: 16,
        };
        assert_eq!(error.to_string(), "Cursor (2, 0) outside a 2x16 display");
    }

    #[test]
    fn test_unsupported_error() {
        let error = HardwareError::unsupported("set_backlight");
        assert_eq!(error.to_string(), "Unsupported operation: set_backlight");
    }
}

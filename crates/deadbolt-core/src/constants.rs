//! Core constants for the Deadbolt PIN lock controller.
//!
//! This module centralizes the compile-time configuration of the device:
//! PIN format, keypad geometry and layout, and the timing of the scan
//! loop, render loop, and feedback cooldowns. Changing these values
//! changes device behavior everywhere; there is no runtime configuration
//! surface besides what is defined here.
//!
//! # Usage
//!
//! ```
//! use deadbolt_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(PIN_LENGTH, DEFAULT_PIN.len());
//!
//! let scan_period = Duration::from_micros(SCAN_INTERVAL_MICROS);
//! assert!(scan_period < Duration::from_millis(RENDER_INTERVAL_MILLIS));
//! ```

// ============================================================================
// PIN Format
// ============================================================================

/// Number of digits in an access code.
///
/// Entry buffers are bounded by this capacity and the persisted credential
/// record is exactly this many bytes.
pub const PIN_LENGTH: usize = 6;

/// Factory access code.
///
/// Written to the credential store whenever the stored record fails
/// validation at boot (uninitialized or corrupted storage).
pub const DEFAULT_PIN: &str = "000000";

// ============================================================================
// Keypad Geometry
// ============================================================================

/// Number of row lines on the matrix keypad.
pub const KEYPAD_ROWS: usize = 4;

/// Number of column lines on the matrix keypad.
pub const KEYPAD_COLS: usize = 3;

/// Physical key layout, indexed as `KEY_LAYOUT[row][column]`.
///
/// Row 0 is the top row of the keypad. The layout is the standard
/// 12-key telephone arrangement.
///
/// # Examples
///
/// ```
/// use deadbolt_core::constants::KEY_LAYOUT;
///
/// assert_eq!(KEY_LAYOUT[0], ['1', '2', '3']);
/// assert_eq!(KEY_LAYOUT[3], ['*', '0', '#']);
/// ```
pub const KEY_LAYOUT: [[char; KEYPAD_COLS]; KEYPAD_ROWS] = [
    ['1', '2', '3'],
    ['4', '5', '6'],
    ['7', '8', '9'],
    ['*', '0', '#'],
];

// ============================================================================
// Timing
// ============================================================================

/// Matrix scan period in microseconds (about 244 Hz).
///
/// One full row sweep runs every period. A key press shorter than one
/// period can be missed; at this rate that bound is well below human
/// key-press durations while still giving the debounce latch clean
/// edges to track.
pub const SCAN_INTERVAL_MICROS: u64 = 4096;

/// Presentation loop period in milliseconds.
///
/// The display is redrawn and the actuator output re-asserted once per
/// period.
pub const RENDER_INTERVAL_MILLIS: u64 = 50;

/// How long the failed-entry screen is held before relocking (milliseconds).
///
/// The cooldown is uninterruptible: no key is honored until it elapses.
pub const ENTRY_ERROR_COOLDOWN_MILLIS: u64 = 3000;

/// How long the PIN-updated confirmation is held before returning to the
/// unlocked screen (milliseconds).
///
/// Uninterruptible, like [`ENTRY_ERROR_COOLDOWN_MILLIS`].
pub const PIN_UPDATED_COOLDOWN_MILLIS: u64 = 2000;

// ============================================================================
// Display Configuration
// ============================================================================

/// Number of display lines.
pub const DISPLAY_LINES: usize = 2;

/// Number of characters per display line.
pub const DISPLAY_COLUMNS: usize = 16;

// ============================================================================
// Event Plumbing
// ============================================================================

/// Bound of the key-event channel between the scanner and the controller.
///
/// The scan tick never blocks on this channel; events beyond the bound
/// are dropped. At a 50 ms consumer period, 32 slots absorb far more
/// input than a keypad can physically produce.
pub const EVENT_CHANNEL_DEPTH: usize = 32;

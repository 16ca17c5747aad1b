//! Hardware capability trait definitions.
//!
//! This module defines the trait interfaces between the lock controller
//! and its peripherals: the keypad matrix pins, the character display,
//! and the lock actuator. The traits establish the contract that both
//! mock devices (development and testing) and real pin-level drivers
//! implement.
//!
//! Display and actuator traits use native `async fn` methods (Rust 1.90 +
//! Edition 2024 RPITIT), eliminating the need for the `async_trait`
//! macro. [`KeypadMatrix`] is deliberately synchronous: it is sampled
//! from inside the fixed-rate scan tick, which must complete within one
//! scan period and must never await or block.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use deadbolt_core::constants::KEYPAD_COLS;

/// Keypad matrix pin interface.
///
/// A 4-row by 3-column matrix is read by driving one row active at a
/// time and sampling the three column inputs. Implementations own the
/// electrical details (active-low sensing, pull-ups); `read_columns`
/// reports plain pressed/not-pressed.
///
/// # Timing Contract
///
/// Both methods run inside the scan tick at roughly 244 Hz. They must
/// return promptly and must never block on I/O, locks held across
/// awaits, or the display/store.
///
/// # Examples
///
/// ```
/// use deadbolt_hardware::traits::KeypadMatrix;
/// use deadbolt_core::constants::KEYPAD_ROWS;
///
/// fn any_key_down<M: KeypadMatrix>(matrix: &mut M) -> bool {
///     (0..KEYPAD_ROWS).any(|row| {
///         matrix.select_row(row);
///         matrix.read_columns().into_iter().any(|down| down)
///     })
/// }
/// ```
pub trait KeypadMatrix: Send + Sync {
    /// Drive the given row active and all other rows inactive.
    fn select_row(&mut self, row: usize);

    /// Sample the column inputs for the currently selected row.
    ///
    /// `true` means the key at that column is held down.
    fn read_columns(&mut self) -> [bool; KEYPAD_COLS];
}

/// Two-line character display.
///
/// The wire protocol behind these operations (bus timing, latch pulses)
/// belongs to the driver; the controller only ever clears, positions the
/// cursor, and prints.
///
/// # Examples
///
/// ```no_run
/// use deadbolt_hardware::traits::CharacterDisplay;
/// use deadbolt_hardware::error::Result;
///
/// async fn splash<D: CharacterDisplay>(display: &mut D) -> Result<()> {
///     display.clear().await?;
///     display.set_cursor(0, 0).await?;
///     display.print("DEADBOLT").await?;
///     Ok(())
/// }
/// ```
pub trait CharacterDisplay: Send + Sync {
    /// Blank the display and home the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or a communication
    /// error occurs.
    async fn clear(&mut self) -> Result<()>;

    /// Move the cursor to `(line, column)`, both zero-based.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is outside the panel or a
    /// communication error occurs.
    async fn set_cursor(&mut self, line: usize, column: usize) -> Result<()>;

    /// Print text starting at the cursor. Text past the end of the line
    /// is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or a communication
    /// error occurs.
    async fn print(&mut self, text: &str) -> Result<()>;
}

/// Lock actuator: one boolean output.
///
/// Engaged means the latch is held open. The controller re-asserts the
/// output every render cycle, so implementations must tolerate repeated
/// writes of the same value.
pub trait LockActuator: Send + Sync {
    /// Drive the actuator output.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or a communication
    /// error occurs.
    async fn set_engaged(&mut self, engaged: bool) -> Result<()>;
}

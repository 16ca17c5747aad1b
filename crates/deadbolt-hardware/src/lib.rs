//! Hardware abstraction layer for the Deadbolt PIN lock controller.
//!
//! This crate provides trait-based abstractions for the device's three
//! peripherals (keypad matrix, character display, lock actuator), the
//! periodic matrix scanner that turns raw pin samples into debounced key
//! events, and mock implementations for development and testing without
//! physical hardware.
//!
//! # Design Philosophy
//!
//! - **One asynchronous input source**: the scanner runs as its own task
//!   at a fixed rate and delivers press edges through a bounded channel.
//!   It never blocks inside a scan tick; the controller is the only
//!   consumer and the only owner of device state.
//! - **Async at the presentation seam**: display and actuator operations
//!   are `async fn` trait methods (Edition 2024 RPITIT), matching the
//!   cooperative presentation loop that drives them.
//! - **Sync at the scan seam**: [`KeypadMatrix`] is synchronous because
//!   it is sampled inside the scan period and must never await.
//! - **Error-aware**: all fallible operations return
//!   [`Result<T>`][error::Result] with detailed error information.
//!
//! # Scanning and Debounce
//!
//! The scanner drives each row active in turn, samples the three column
//! inputs, and maps the active position through the static layout table
//! (rows `1 2 3` / `4 5 6` / `7 8 9` / `* 0 #`). A press edge is
//! reported once per physical press: holds emit nothing, release clears
//! the latch, and while one key is latched every other key is ignored.
//!
//! ```
//! use deadbolt_hardware::mock::MockMatrix;
//! use deadbolt_hardware::scanner::KeypadScanner;
//! use deadbolt_core::Key;
//!
//! let (matrix, handle) = MockMatrix::new();
//! let mut scanner = KeypadScanner::new(matrix);
//!
//! handle.press(Key::Digit(1));
//! assert_eq!(scanner.poll().map(|e| e.key), Some(Key::Digit(1)));
//! assert!(scanner.poll().is_none()); // hold: no repeat
//! ```
//!
//! # Mock Implementations
//!
//! Every peripheral has a mock in [`mock`], shaped as a device/handle
//! pair: the device half goes to the scanner or controller, the handle
//! half stays with the test to inject presses and observe the rendered
//! frame and actuator output.

pub mod error;
pub mod mock;
pub mod scanner;
pub mod traits;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use scanner::{KeypadScanner, event_channel, key_position, layout_key};
pub use traits::{CharacterDisplay, KeypadMatrix, LockActuator};

//! Device controller for the Deadbolt PIN lock.
//!
//! This crate contains the authentication state machine and the
//! presentation loop that together form the control core of the device:
//! key events in, display frames and actuator output out, with the
//! credential persisted through `deadbolt-store`.
//!
//! # Concurrency Model
//!
//! Two tasks, one owner. The keypad scanner (from `deadbolt-hardware`)
//! runs at a fixed high rate and pushes debounced key events into a
//! bounded channel; the [`Device`] presentation loop is the channel's
//! only consumer and the only context that ever touches the state
//! machine. The loop may sleep for seconds at a time while a feedback
//! screen is held, and the scanner keeps producing in the meantime, but
//! events that arrive during a hold are deterministically discarded when
//! it ends.
//!
//! ```text
//! ┌───────────────┐   KeyEvent    ┌──────────────────────────────┐
//! │ KeypadScanner │──────────────►│ Device                       │
//! │ (244 Hz task) │  mpsc (32)    │  AuthStateMachine            │──► Display
//! └───────────────┘               │  render / actuate / cooldown │──► Actuator
//!                                 └──────────────┬───────────────┘
//!                                                ▼
//!                                        CredentialStore
//! ```

pub mod error;
pub mod presentation;
pub mod state_machine;

pub use error::{DeviceError, DeviceResult};
pub use presentation::{Device, frame_for};
pub use state_machine::{AuthStateMachine, StateChange};

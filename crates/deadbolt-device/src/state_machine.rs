//! Authentication state machine for the PIN lock.
//!
//! This module provides the single owning context for everything the
//! device mutates: the current [`DeviceState`], the digit entry buffer,
//! the in-memory credential, and the credential store. Key events reach
//! it through one channel and one consumer, so no other execution
//! context ever reads or writes this state concurrently.
//!
//! # States
//!
//! - `Locked`: latch closed, collecting an access code
//! - `Unlocked`: latch open; `#` relocks, `*` starts a PIN change
//! - `EntryError`: wrong code; display held, then auto-relock
//! - `SettingPin`: collecting the replacement code
//! - `PinUpdated`: new code persisted; display held, then auto-unlock
//!
//! # Transitions
//!
//! Key-driven transitions are handled by [`AuthStateMachine::handle_key`]:
//!
//! - `Locked` + digit: append; on the sixth digit compare against the
//!   credential → `Unlocked` (match) or `EntryError` (mismatch), buffer
//!   cleared either way
//! - `Locked`/`Unlocked`/`SettingPin` + `#`: clear the entry and lock
//!   (a `#` during `SettingPin` aborts without touching the credential)
//! - `Unlocked` + `*`: begin a PIN change
//! - `SettingPin` + digit: append; on the sixth digit persist the new
//!   code, then adopt it and report `PinUpdated`
//! - `EntryError` and `PinUpdated` honor no key at all
//!
//! The two timed exits from the cooldown states belong to the
//! presentation loop, which calls [`AuthStateMachine::finish_cooldown`]
//! after the hold elapses.
//!
//! # Examples
//!
//! ```
//! use deadbolt_core::{DeviceState, Key};
//! use deadbolt_device::AuthStateMachine;
//! use deadbolt_store::MemoryCredentialStore;
//!
//! let store = MemoryCredentialStore::with_record(*b"123456");
//! let mut machine = AuthStateMachine::new(store).unwrap();
//! assert_eq!(machine.state(), DeviceState::Locked);
//!
//! for c in "123456".chars() {
//!     machine.handle_key(Key::from_char(c).unwrap()).unwrap();
//! }
//! assert_eq!(machine.state(), DeviceState::Unlocked);
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use deadbolt_core::{AccessCode, DeviceState, Key, PinBuffer};
use deadbolt_store::{CredentialStore, StoreResult, provision};

/// A single state transition with timestamp.
///
/// # Serialization Note
///
/// The `timestamp` field is not serialized as `Instant` is
/// process-specific. When deserializing, the timestamp will be set to
/// the current time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateChange {
    /// The state transitioned from.
    pub from: DeviceState,

    /// The state transitioned to.
    pub to: DeviceState,

    /// When the transition occurred.
    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl StateChange {
    /// Create a transition record stamped with the current time.
    #[must_use]
    pub fn new(from: DeviceState, to: DeviceState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }

    /// Time elapsed since this transition occurred.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// The authentication state machine.
///
/// Owns the device state, entry buffer, credential, and store. Replaces
/// what would otherwise be a set of shared globals with one explicit
/// context threaded through calls.
///
/// # Thread Safety
///
/// This struct is not thread-safe by design: exactly one task owns it
/// and feeds it key events drained from the scanner channel.
pub struct AuthStateMachine<S: CredentialStore> {
    state: DeviceState,
    entry: PinBuffer,
    credential: AccessCode,
    store: S,
}

impl<S: CredentialStore> AuthStateMachine<S> {
    /// Create a machine in the `Locked` state, provisioning the
    /// credential from the store.
    ///
    /// An invalid or uninitialized record is reseeded with the factory
    /// default and written back before the machine starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read, or if the reseed
    /// write fails.
    pub fn new(mut store: S) -> StoreResult<Self> {
        let credential = provision(&mut store)?;
        Ok(Self {
            state: DeviceState::Locked,
            entry: PinBuffer::new(),
            credential,
            store,
        })
    }

    /// Current device state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// The digits entered so far.
    #[must_use]
    pub fn entry(&self) -> &PinBuffer {
        &self.entry
    }

    /// The active credential.
    #[must_use]
    pub fn credential(&self) -> &AccessCode {
        &self.credential
    }

    /// Apply one key press.
    ///
    /// Returns the transition it caused, if any. Keys with no defined
    /// effect in the current state are ignored, and the cooldown states
    /// ignore every key.
    ///
    /// # Errors
    ///
    /// Returns an error only if persisting a completed PIN change
    /// fails; the credential is not adopted in that case.
    pub fn handle_key(&mut self, key: Key) -> StoreResult<Option<StateChange>> {
        if self.state.is_cooldown() {
            return Ok(None);
        }

        match (self.state, key) {
            (_, Key::Hash) => {
                self.entry.clear();
                if self.state == DeviceState::Locked {
                    return Ok(None);
                }
                Ok(Some(self.transition(DeviceState::Locked)))
            }
            (DeviceState::Unlocked, Key::Star) => {
                Ok(Some(self.transition(DeviceState::SettingPin)))
            }
            (DeviceState::Locked, Key::Digit(d)) => {
                self.entry.push(d);
                if !self.entry.is_full() {
                    return Ok(None);
                }
                let matched = self.credential.matches(self.entry.as_str());
                self.entry.clear();
                let next = if matched {
                    DeviceState::Unlocked
                } else {
                    DeviceState::EntryError
                };
                Ok(Some(self.transition(next)))
            }
            (DeviceState::SettingPin, Key::Digit(d)) => {
                self.entry.push(d);
                if !self.entry.is_full() {
                    return Ok(None);
                }
                let code = AccessCode::from_bytes(self.entry.as_str().as_bytes())?;
                // Durable before the new state can be observed.
                self.store.save(&code)?;
                self.credential = code;
                self.entry.clear();
                Ok(Some(self.transition(DeviceState::PinUpdated)))
            }
            // Digits while unlocked, `*` anywhere else: no effect.
            _ => Ok(None),
        }
    }

    /// Complete a timed cooldown: `EntryError` relocks, `PinUpdated`
    /// returns to `Unlocked`.
    ///
    /// No-op in every other state. Called by the presentation loop once
    /// the hold duration has elapsed.
    pub fn finish_cooldown(&mut self) -> Option<StateChange> {
        let next = match self.state {
            DeviceState::EntryError => DeviceState::Locked,
            DeviceState::PinUpdated => DeviceState::Unlocked,
            _ => return None,
        };
        Some(self.transition(next))
    }

    fn transition(&mut self, to: DeviceState) -> StateChange {
        let change = StateChange::new(self.state, to);
        tracing::debug!(from = %change.from, to = %change.to, "State transition");
        self.state = to;
        change
    }
}

//! Presentation loop: display rendering, actuator drive, timed holds.
//!
//! The [`Device`] is the cooperative half of the controller. It is the
//! sole consumer of the scanner's event channel and therefore the sole
//! mutator of the authentication state machine; the scanner can keep
//! producing while this loop sleeps, but nothing it produces is applied
//! until the loop drains the channel.
//!
//! Each iteration:
//!
//! 1. drain pending key events into the state machine;
//! 2. redraw the display from the current state;
//! 3. re-assert the actuator output (a pure function of state, written
//!    every cycle rather than only on change);
//! 4. sleep for the refresh period, or for the state's cooldown.
//!
//! After a cooldown elapses, every key event that arrived while the
//! display was held is discarded before the forced transition is
//! applied. Input during a cooldown therefore never leaks into the next
//! state, regardless of timing. Cooldowns always run to completion;
//! there is no abort path.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::{self, Duration};

use deadbolt_core::constants::{DISPLAY_COLUMNS, RENDER_INTERVAL_MILLIS};
use deadbolt_core::{AccessCode, DeviceState, KeyEvent, PinBuffer};
use deadbolt_hardware::traits::{CharacterDisplay, LockActuator};
use deadbolt_store::CredentialStore;

use crate::error::DeviceResult;
use crate::state_machine::AuthStateMachine;

/// Compute the two display lines for a state.
///
/// Pure: the same state, entry, and credential always produce the same
/// frame. Lines longer than the panel are truncated.
///
/// # Examples
///
/// ```
/// use deadbolt_core::{AccessCode, DeviceState, PinBuffer};
/// use deadbolt_device::frame_for;
///
/// let code: AccessCode = "123456".parse().unwrap();
/// let mut entry = PinBuffer::new();
/// entry.push(4);
/// entry.push(2);
///
/// let (top, bottom) = frame_for(DeviceState::Locked, &entry, &code);
/// assert_eq!(top, "ENTER PIN:");
/// assert_eq!(bottom, "42");
/// ```
#[must_use]
pub fn frame_for(state: DeviceState, entry: &PinBuffer, credential: &AccessCode) -> (String, String) {
    let (top, bottom) = match state {
        DeviceState::Unlocked => ("UNLOCKED".to_string(), "#-LOCK *-NEW PIN".to_string()),
        DeviceState::Locked => ("ENTER PIN:".to_string(), entry.as_str().to_string()),
        DeviceState::SettingPin => ("NEW PIN:".to_string(), entry.as_str().to_string()),
        DeviceState::EntryError => ("ERROR!".to_string(), "TRY AGAIN!".to_string()),
        DeviceState::PinUpdated => ("NEW PIN SET!".to_string(), format!("PIN:{credential}")),
    };
    (fit(top), fit(bottom))
}

/// Truncate a line to the panel width.
fn fit(line: String) -> String {
    if line.len() <= DISPLAY_COLUMNS {
        line
    } else {
        line.chars().take(DISPLAY_COLUMNS).collect()
    }
}

/// The device controller: state machine plus presentation loop.
///
/// Generic over the display, actuator, and credential store so the same
/// loop drives mocks in tests and real drivers on hardware.
///
/// # Examples
///
/// ```no_run
/// use deadbolt_device::{AuthStateMachine, Device};
/// use deadbolt_hardware::mock::{MockActuator, MockDisplay, MockMatrix};
/// use deadbolt_hardware::{KeypadScanner, event_channel};
/// use deadbolt_store::MemoryCredentialStore;
///
/// # async fn example() -> deadbolt_device::DeviceResult<()> {
/// let machine = AuthStateMachine::new(MemoryCredentialStore::new())?;
/// let (matrix, _keys) = MockMatrix::new();
/// let (display, _screen) = MockDisplay::new();
/// let (actuator, _latch) = MockActuator::new();
/// let (tx, rx) = event_channel();
///
/// tokio::spawn(KeypadScanner::new(matrix).run(tx));
/// Device::new(machine, display, actuator, rx).run().await?;
/// # Ok(())
/// # }
/// ```
pub struct Device<D, L, S>
where
    D: CharacterDisplay,
    L: LockActuator,
    S: CredentialStore,
{
    machine: AuthStateMachine<S>,
    display: D,
    actuator: L,
    events: mpsc::Receiver<KeyEvent>,
}

impl<D, L, S> Device<D, L, S>
where
    D: CharacterDisplay,
    L: LockActuator,
    S: CredentialStore,
{
    /// Assemble a device from its parts and the scanner's event channel.
    pub fn new(
        machine: AuthStateMachine<S>,
        display: D,
        actuator: L,
        events: mpsc::Receiver<KeyEvent>,
    ) -> Self {
        Self {
            machine,
            display,
            actuator,
            events,
        }
    }

    /// Read-only access to the state machine.
    #[must_use]
    pub fn machine(&self) -> &AuthStateMachine<S> {
        &self.machine
    }

    /// Run the presentation loop.
    ///
    /// Runs until the event channel closes (scanner gone), which ends
    /// the loop cleanly after a final render.
    ///
    /// # Errors
    ///
    /// Returns an error if a display or actuator operation fails, or if
    /// persisting a PIN change fails. Errors here are fatal: the loop
    /// does not attempt to limp along with hardware or storage it can
    /// no longer trust.
    pub async fn run(mut self) -> DeviceResult<()> {
        let refresh = Duration::from_millis(RENDER_INTERVAL_MILLIS);

        loop {
            let open = self.drain_events()?;
            self.render().await?;

            if !open {
                tracing::debug!("Key event channel closed, stopping presentation loop");
                return Ok(());
            }

            match self.machine.state().cooldown() {
                Some(hold) => {
                    // The held frame stays up for the full duration; no
                    // key can shorten it.
                    time::sleep(hold).await;
                    self.discard_pending();
                    if let Some(change) = self.machine.finish_cooldown() {
                        tracing::info!(from = %change.from, to = %change.to, "Timed transition");
                    }
                }
                None => time::sleep(refresh).await,
            }
        }
    }

    /// Apply every queued key event. Returns `false` once the channel
    /// has closed and drained.
    fn drain_events(&mut self) -> DeviceResult<bool> {
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    if let Some(change) = self.machine.handle_key(event.key)? {
                        tracing::info!(
                            key = %event.key,
                            from = %change.from,
                            to = %change.to,
                            "State transition"
                        );
                    }
                }
                Err(TryRecvError::Empty) => return Ok(true),
                Err(TryRecvError::Disconnected) => return Ok(false),
            }
        }
    }

    /// Throw away everything that queued while a cooldown was held.
    fn discard_pending(&mut self) {
        let mut dropped = 0usize;
        while self.events.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            tracing::debug!(dropped, "Discarded key presses received during cooldown");
        }
    }

    /// Redraw the display and re-assert the actuator from current state.
    async fn render(&mut self) -> DeviceResult<()> {
        let (top, bottom) = frame_for(
            self.machine.state(),
            self.machine.entry(),
            self.machine.credential(),
        );

        self.display.clear().await?;
        self.display.set_cursor(0, 0).await?;
        self.display.print(&top).await?;
        self.display.set_cursor(1, 0).await?;
        self.display.print(&bottom).await?;

        self.actuator
            .set_engaged(self.machine.state().latch_open())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> AccessCode {
        "123456".parse().unwrap()
    }

    fn entry_of(digits: &[u8]) -> PinBuffer {
        let mut entry = PinBuffer::new();
        for &d in digits {
            entry.push(d);
        }
        entry
    }

    #[test]
    fn test_frame_unlocked() {
        let (top, bottom) = frame_for(DeviceState::Unlocked, &PinBuffer::new(), &code());
        assert_eq!(top, "UNLOCKED");
        assert_eq!(bottom, "#-LOCK *-NEW PIN");
    }

    #[test]
    fn test_frame_locked_echoes_entry() {
        let (top, bottom) = frame_for(DeviceState::Locked, &entry_of(&[1, 2, 3]), &code());
        assert_eq!(top, "ENTER PIN:");
        assert_eq!(bottom, "123");
    }

    #[test]
    fn test_frame_setting_pin_echoes_entry() {
        let (top, bottom) = frame_for(DeviceState::SettingPin, &entry_of(&[9]), &code());
        assert_eq!(top, "NEW PIN:");
        assert_eq!(bottom, "9");
    }

    #[test]
    fn test_frame_entry_error() {
        let (top, bottom) = frame_for(DeviceState::EntryError, &PinBuffer::new(), &code());
        assert_eq!(top, "ERROR!");
        assert_eq!(bottom, "TRY AGAIN!");
    }

    #[test]
    fn test_frame_pin_updated_shows_credential() {
        let (top, bottom) = frame_for(DeviceState::PinUpdated, &PinBuffer::new(), &code());
        assert_eq!(top, "NEW PIN SET!");
        assert_eq!(bottom, "PIN:123456");
    }

    #[test]
    fn test_frames_are_deterministic() {
        // Rendering the same state twice with no intervening input must
        // produce identical output, and the actuator mapping is a pure
        // function of state.
        let entry = entry_of(&[4, 2]);
        for state in [
            DeviceState::Locked,
            DeviceState::Unlocked,
            DeviceState::EntryError,
            DeviceState::SettingPin,
            DeviceState::PinUpdated,
        ] {
            assert_eq!(
                frame_for(state, &entry, &code()),
                frame_for(state, &entry, &code())
            );
            assert_eq!(state.latch_open(), state == DeviceState::Unlocked);
        }
    }

    #[test]
    fn test_frame_lines_fit_panel() {
        let entry = entry_of(&[1, 2, 3, 4, 5, 6]);
        for state in [
            DeviceState::Locked,
            DeviceState::Unlocked,
            DeviceState::EntryError,
            DeviceState::SettingPin,
            DeviceState::PinUpdated,
        ] {
            let (top, bottom) = frame_for(state, &entry, &code());
            assert!(top.len() <= DISPLAY_COLUMNS);
            assert!(bottom.len() <= DISPLAY_COLUMNS);
        }
    }
}

//! Periodic keypad matrix scanner with edge debouncing.
//!
//! The scanner sweeps the 4x3 matrix at a fixed rate, maps the active
//! (row, column) position through the static layout table, and emits one
//! [`KeyEvent`] per physical press: an event fires only on the
//! released-to-pressed transition of the tracked key, a sustained hold
//! emits nothing, and release clears the latch. Only one key is tracked
//! at a time; presses of other keys are ignored while the latch is
//! active.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  244 Hz tick  ┌───────────────┐  try_send   ┌────────────┐
//! │ tokio      │──────────────►│ KeypadScanner │────────────►│ Event      │
//! │ interval   │               │ (sweep+latch) │             │ Channel    │──► Controller
//! └────────────┘               └───────────────┘             └────────────┘
//! ```
//!
//! The scan tick never blocks: events are forwarded with `try_send`, and
//! a full channel drops the event rather than stalling the sweep.
//!
//! # Examples
//!
//! ```
//! use deadbolt_hardware::mock::MockMatrix;
//! use deadbolt_hardware::scanner::KeypadScanner;
//! use deadbolt_core::Key;
//!
//! let (matrix, handle) = MockMatrix::new();
//! let mut scanner = KeypadScanner::new(matrix);
//!
//! handle.press(Key::Digit(5));
//! let event = scanner.poll().expect("press edge");
//! assert_eq!(event.key, Key::Digit(5));
//!
//! // Holding the key produces no repeat events.
//! assert!(scanner.poll().is_none());
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::MissedTickBehavior;

use deadbolt_core::constants::{EVENT_CHANNEL_DEPTH, KEY_LAYOUT, KEYPAD_ROWS, SCAN_INTERVAL_MICROS};
use deadbolt_core::{Key, KeyEvent};

use crate::traits::KeypadMatrix;

/// Create the bounded key-event channel between scanner and controller.
///
/// Single producer (the scanner task), single consumer (the controller).
#[must_use]
pub fn event_channel() -> (mpsc::Sender<KeyEvent>, mpsc::Receiver<KeyEvent>) {
    mpsc::channel(EVENT_CHANNEL_DEPTH)
}

/// The key at a layout position.
#[must_use]
pub fn layout_key(row: usize, column: usize) -> Key {
    match KEY_LAYOUT[row][column] {
        '*' => Key::Star,
        '#' => Key::Hash,
        c => Key::Digit(c as u8 - b'0'),
    }
}

/// The layout position of a key.
#[must_use]
pub fn key_position(key: Key) -> (usize, usize) {
    let c = key.to_char();
    for (row, columns) in KEY_LAYOUT.iter().enumerate() {
        if let Some(column) = columns.iter().position(|&k| k == c) {
            return (row, column);
        }
    }
    // Every Key variant appears in KEY_LAYOUT.
    unreachable!("key {key} missing from layout table")
}

/// Matrix keypad scanner with a single held-key debounce latch.
pub struct KeypadScanner<M: KeypadMatrix> {
    matrix: M,

    /// The key whose press edge was last reported and has not yet been
    /// released.
    held: Option<Key>,
}

impl<M: KeypadMatrix> KeypadScanner<M> {
    /// Create a scanner over the given matrix pins.
    pub fn new(matrix: M) -> Self {
        Self { matrix, held: None }
    }

    /// The key currently latched as held, if any.
    #[must_use]
    pub fn held(&self) -> Option<Key> {
        self.held
    }

    /// Perform one full matrix sweep.
    ///
    /// Returns `Some(KeyEvent)` exactly when a new press edge is
    /// detected. While a latched key stays down, every other key is
    /// ignored; after it releases, the next sweep may latch a new key.
    pub fn poll(&mut self) -> Option<KeyEvent> {
        let mut held_still_down = false;
        let mut first_pressed: Option<Key> = None;

        for row in 0..KEYPAD_ROWS {
            self.matrix.select_row(row);
            let columns = self.matrix.read_columns();
            for (column, down) in columns.iter().enumerate() {
                if !down {
                    continue;
                }
                let key = layout_key(row, column);
                if self.held == Some(key) {
                    held_still_down = true;
                }
                if first_pressed.is_none() {
                    first_pressed = Some(key);
                }
            }
        }

        match self.held {
            // Sustained hold: no repeats, secondary presses ignored.
            Some(_) if held_still_down => None,
            // Tracked key released; a new key is picked up on a later sweep.
            Some(_) => {
                self.held = None;
                None
            }
            None => first_pressed.map(|key| {
                self.held = Some(key);
                KeyEvent::new(key)
            }),
        }
    }

    /// Run the scan loop, forwarding press edges into `events`.
    ///
    /// Sweeps at the fixed scan rate (missed ticks are skipped, not
    /// bursted). Forwarding uses `try_send` so the tick can never stall
    /// on a slow consumer; a full channel drops the event with a
    /// warning. Returns when the receiving side of the channel is
    /// dropped.
    pub async fn run(mut self, events: mpsc::Sender<KeyEvent>) {
        let mut ticker = tokio::time::interval(Duration::from_micros(SCAN_INTERVAL_MICROS));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let Some(event) = self.poll() else {
                continue;
            };
            match events.try_send(event) {
                Ok(()) => {}
                Err(TrySendError::Full(event)) => {
                    tracing::warn!(key = %event.key, "Key event queue full, dropping press");
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!("Key event channel closed, stopping keypad scan");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockMatrix;
    use deadbolt_core::constants::KEYPAD_COLS;

    fn scanner() -> (KeypadScanner<MockMatrix>, crate::mock::MockMatrixHandle) {
        let (matrix, handle) = MockMatrix::new();
        (KeypadScanner::new(matrix), handle)
    }

    #[test]
    fn test_layout_maps_all_twelve_keys() {
        let expected = [
            [Key::Digit(1), Key::Digit(2), Key::Digit(3)],
            [Key::Digit(4), Key::Digit(5), Key::Digit(6)],
            [Key::Digit(7), Key::Digit(8), Key::Digit(9)],
            [Key::Star, Key::Digit(0), Key::Hash],
        ];
        for row in 0..KEYPAD_ROWS {
            for column in 0..KEYPAD_COLS {
                assert_eq!(layout_key(row, column), expected[row][column]);
                assert_eq!(key_position(expected[row][column]), (row, column));
            }
        }
    }

    #[test]
    fn test_press_edge_fires_once() {
        let (mut scanner, handle) = scanner();

        handle.press(Key::Digit(7));
        let event = scanner.poll().expect("rising edge");
        assert_eq!(event.key, Key::Digit(7));

        // Hold across many sweeps: no repeats.
        for _ in 0..100 {
            assert!(scanner.poll().is_none());
        }
    }

    #[test]
    fn test_release_then_repress_fires_again() {
        let (mut scanner, handle) = scanner();

        handle.press(Key::Hash);
        assert!(scanner.poll().is_some());

        handle.release(Key::Hash);
        assert!(scanner.poll().is_none());
        assert_eq!(scanner.held(), None);

        handle.press(Key::Hash);
        let event = scanner.poll().expect("second rising edge");
        assert_eq!(event.key, Key::Hash);
    }

    #[test]
    fn test_secondary_press_ignored_while_latched() {
        let (mut scanner, handle) = scanner();

        handle.press(Key::Digit(1));
        assert_eq!(scanner.poll().map(|e| e.key), Some(Key::Digit(1)));

        // A second key pressed while the first is still down is ignored
        // for as long as the latch is active.
        handle.press(Key::Digit(2));
        for _ in 0..10 {
            assert!(scanner.poll().is_none());
        }

        // Releasing the latched key clears the latch; the still-held
        // second key is reported on the following sweep.
        handle.release(Key::Digit(1));
        assert!(scanner.poll().is_none());
        assert_eq!(scanner.poll().map(|e| e.key), Some(Key::Digit(2)));
    }

    #[test]
    fn test_idle_sweeps_emit_nothing() {
        let (mut scanner, _handle) = scanner();
        for _ in 0..10 {
            assert!(scanner.poll().is_none());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_forwards_press_edges() {
        let (matrix, handle) = MockMatrix::new();
        let (tx, mut rx) = event_channel();
        tokio::spawn(KeypadScanner::new(matrix).run(tx));

        handle.press(Key::Star);
        let event = rx.recv().await.expect("event forwarded");
        assert_eq!(event.key, Key::Star);

        handle.release(Key::Star);
        handle.press(Key::Digit(0));
        let event = rx.recv().await.expect("event forwarded");
        assert_eq!(event.key, Key::Digit(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_when_receiver_dropped() {
        let (matrix, handle) = MockMatrix::new();
        let (tx, rx) = event_channel();
        let task = tokio::spawn(KeypadScanner::new(matrix).run(tx));

        drop(rx);
        handle.press(Key::Digit(3));

        task.await.expect("scan task ends cleanly");
    }
}

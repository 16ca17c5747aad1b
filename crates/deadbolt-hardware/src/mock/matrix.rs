//! Mock keypad matrix for testing and development.
//!
//! This module simulates the keypad's row/column pins. Tests press and
//! release keys through a [`MockMatrixHandle`]; the [`MockMatrix`] half
//! answers row selection and column sampling exactly like the physical
//! matrix would, including multiple keys held at once.

use std::sync::{Arc, Mutex};

use deadbolt_core::Key;
use deadbolt_core::constants::{KEYPAD_COLS, KEYPAD_ROWS};

use crate::scanner::key_position;
use crate::traits::KeypadMatrix;

type PressedGrid = [[bool; KEYPAD_COLS]; KEYPAD_ROWS];

/// Mock keypad matrix pins.
///
/// # Examples
///
/// ```
/// use deadbolt_hardware::mock::MockMatrix;
/// use deadbolt_hardware::traits::KeypadMatrix;
/// use deadbolt_core::Key;
///
/// let (mut matrix, handle) = MockMatrix::new();
///
/// handle.press(Key::Digit(5)); // row 1, column 1
/// matrix.select_row(1);
/// assert_eq!(matrix.read_columns(), [false, true, false]);
///
/// matrix.select_row(0);
/// assert_eq!(matrix.read_columns(), [false, false, false]);
/// ```
#[derive(Debug)]
pub struct MockMatrix {
    pressed: Arc<Mutex<PressedGrid>>,
    selected_row: usize,
}

impl MockMatrix {
    /// Create a mock matrix with no keys pressed.
    ///
    /// Returns the matrix (for the scanner) and the handle (for the
    /// test).
    pub fn new() -> (Self, MockMatrixHandle) {
        let pressed = Arc::new(Mutex::new([[false; KEYPAD_COLS]; KEYPAD_ROWS]));
        let matrix = Self {
            pressed: Arc::clone(&pressed),
            selected_row: 0,
        };
        (matrix, MockMatrixHandle { pressed })
    }
}

impl KeypadMatrix for MockMatrix {
    fn select_row(&mut self, row: usize) {
        debug_assert!(row < KEYPAD_ROWS, "Row must be 0-{}", KEYPAD_ROWS - 1);
        self.selected_row = row;
    }

    fn read_columns(&mut self) -> [bool; KEYPAD_COLS] {
        let grid = self.pressed.lock().unwrap_or_else(|e| e.into_inner());
        grid[self.selected_row]
    }
}

/// Handle for pressing and releasing keys on a [`MockMatrix`].
///
/// Can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockMatrixHandle {
    pressed: Arc<Mutex<PressedGrid>>,
}

impl MockMatrixHandle {
    /// Hold a key down. It stays down until released.
    pub fn press(&self, key: Key) {
        let (row, column) = key_position(key);
        let mut grid = self.pressed.lock().unwrap_or_else(|e| e.into_inner());
        grid[row][column] = true;
    }

    /// Release a single key.
    pub fn release(&self, key: Key) {
        let (row, column) = key_position(key);
        let mut grid = self.pressed.lock().unwrap_or_else(|e| e.into_inner());
        grid[row][column] = false;
    }

    /// Release every key.
    pub fn release_all(&self) {
        let mut grid = self.pressed.lock().unwrap_or_else(|e| e.into_inner());
        *grid = [[false; KEYPAD_COLS]; KEYPAD_ROWS];
    }

    /// Whether a key is currently held down.
    #[must_use]
    pub fn is_pressed(&self, key: Key) -> bool {
        let (row, column) = key_position(key);
        let grid = self.pressed.lock().unwrap_or_else(|e| e.into_inner());
        grid[row][column]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_sets_only_its_row_and_column() {
        let (mut matrix, handle) = MockMatrix::new();

        handle.press(Key::Digit(9)); // row 2, column 2
        for row in 0..KEYPAD_ROWS {
            matrix.select_row(row);
            let columns = matrix.read_columns();
            if row == 2 {
                assert_eq!(columns, [false, false, true]);
            } else {
                assert_eq!(columns, [false; KEYPAD_COLS]);
            }
        }
    }

    #[test]
    fn test_multiple_keys_held() {
        let (mut matrix, handle) = MockMatrix::new();

        handle.press(Key::Digit(1));
        handle.press(Key::Digit(3));
        matrix.select_row(0);
        assert_eq!(matrix.read_columns(), [true, false, true]);

        handle.release(Key::Digit(1));
        assert_eq!(matrix.read_columns(), [false, false, true]);

        handle.release_all();
        assert_eq!(matrix.read_columns(), [false; KEYPAD_COLS]);
    }

    #[test]
    fn test_is_pressed() {
        let (_matrix, handle) = MockMatrix::new();

        assert!(!handle.is_pressed(Key::Star));
        handle.press(Key::Star);
        assert!(handle.is_pressed(Key::Star));
        handle.release(Key::Star);
        assert!(!handle.is_pressed(Key::Star));
    }
}

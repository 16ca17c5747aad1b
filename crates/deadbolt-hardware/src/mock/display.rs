//! Mock character display for testing and development.
//!
//! Simulates a 2-line by 16-column character panel. The
//! [`MockDisplayHandle`] lets tests read back the rendered frame while
//! the controller owns the [`MockDisplay`] half.

use std::sync::{Arc, Mutex};

use deadbolt_core::constants::{DISPLAY_COLUMNS, DISPLAY_LINES};

use crate::error::{HardwareError, Result};
use crate::traits::CharacterDisplay;

#[derive(Debug)]
struct Panel {
    /// Character cells, one `DISPLAY_COLUMNS`-wide vector per line.
    cells: [[char; DISPLAY_COLUMNS]; DISPLAY_LINES],
    cursor: (usize, usize),
    /// Number of completed `clear` calls, used by tests to count frames.
    clears: usize,
}

impl Panel {
    fn blank() -> Self {
        Self {
            cells: [[' '; DISPLAY_COLUMNS]; DISPLAY_LINES],
            cursor: (0, 0),
            clears: 0,
        }
    }

    fn line(&self, line: usize) -> String {
        self.cells[line].iter().collect()
    }
}

/// Mock display device.
///
/// # Examples
///
/// ```
/// use deadbolt_hardware::mock::MockDisplay;
/// use deadbolt_hardware::traits::CharacterDisplay;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> deadbolt_hardware::Result<()> {
/// let (mut display, handle) = MockDisplay::new();
///
/// display.clear().await?;
/// display.set_cursor(0, 0).await?;
/// display.print("ENTER PIN:").await?;
///
/// assert_eq!(handle.line(0).trim_end(), "ENTER PIN:");
/// assert_eq!(handle.line(1).trim_end(), "");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MockDisplay {
    panel: Arc<Mutex<Panel>>,
}

impl MockDisplay {
    /// Create a blank mock display and its observation handle.
    pub fn new() -> (Self, MockDisplayHandle) {
        let panel = Arc::new(Mutex::new(Panel::blank()));
        let display = Self {
            panel: Arc::clone(&panel),
        };
        (display, MockDisplayHandle { panel })
    }
}

impl CharacterDisplay for MockDisplay {
    async fn clear(&mut self) -> Result<()> {
        let mut panel = self.panel.lock().unwrap_or_else(|e| e.into_inner());
        panel.cells = [[' '; DISPLAY_COLUMNS]; DISPLAY_LINES];
        panel.cursor = (0, 0);
        panel.clears += 1;
        Ok(())
    }

    async fn set_cursor(&mut self, line: usize, column: usize) -> Result<()> {
        if line >= DISPLAY_LINES || column >= DISPLAY_COLUMNS {
            return Err(HardwareError::CursorOutOfRange {
                line,
                column,
                lines: DISPLAY_LINES,
                columns: DISPLAY_COLUMNS,
            });
        }
        let mut panel = self.panel.lock().unwrap_or_else(|e| e.into_inner());
        panel.cursor = (line, column);
        Ok(())
    }

    async fn print(&mut self, text: &str) -> Result<()> {
        let mut panel = self.panel.lock().unwrap_or_else(|e| e.into_inner());
        let (line, mut column) = panel.cursor;
        for c in text.chars() {
            if column >= DISPLAY_COLUMNS {
                break; // text past the end of the line is discarded
            }
            panel.cells[line][column] = c;
            column += 1;
        }
        panel.cursor = (line, column.min(DISPLAY_COLUMNS - 1));
        Ok(())
    }
}

/// Handle for reading back what a [`MockDisplay`] is showing.
///
/// Can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockDisplayHandle {
    panel: Arc<Mutex<Panel>>,
}

impl MockDisplayHandle {
    /// The full contents of one line, space-padded to the panel width.
    #[must_use]
    pub fn line(&self, line: usize) -> String {
        let panel = self.panel.lock().unwrap_or_else(|e| e.into_inner());
        panel.line(line)
    }

    /// Both lines as a `(top, bottom)` pair, trailing padding trimmed.
    #[must_use]
    pub fn frame(&self) -> (String, String) {
        let panel = self.panel.lock().unwrap_or_else(|e| e.into_inner());
        (
            panel.line(0).trim_end().to_string(),
            panel.line(1).trim_end().to_string(),
        )
    }

    /// How many times the display has been cleared (one per rendered
    /// frame).
    #[must_use]
    pub fn frames_rendered(&self) -> usize {
        let panel = self.panel.lock().unwrap_or_else(|e| e.into_inner());
        panel.clears
    }
}

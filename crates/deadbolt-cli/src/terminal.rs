//! Terminal-backed display and actuator for the demo binary.

use deadbolt_core::constants::{DISPLAY_COLUMNS, DISPLAY_LINES};
use deadbolt_hardware::error::{HardwareError, Result};
use deadbolt_hardware::traits::{CharacterDisplay, LockActuator};

type Cells = [[char; DISPLAY_COLUMNS]; DISPLAY_LINES];

const BLANK: Cells = [[' '; DISPLAY_COLUMNS]; DISPLAY_LINES];

/// Character display that draws the panel to stdout.
///
/// The controller redraws every refresh period whether or not anything
/// changed, so this implementation only prints a frame when its contents
/// differ from the one last shown. A frame is considered complete once
/// the bottom line has been printed.
pub struct TerminalDisplay {
    cells: Cells,
    cursor: (usize, usize),
    shown: Option<Cells>,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            cells: BLANK,
            cursor: (0, 0),
            shown: None,
        }
    }

    fn flush_if_changed(&mut self) {
        if self.shown.as_ref() == Some(&self.cells) {
            return;
        }
        let border: String = "-".repeat(DISPLAY_COLUMNS);
        println!("+{border}+");
        for line in &self.cells {
            let text: String = line.iter().collect();
            println!("|{text}|");
        }
        println!("+{border}+");
        self.shown = Some(self.cells);
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterDisplay for TerminalDisplay {
    async fn clear(&mut self) -> Result<()> {
        self.cells = BLANK;
        self.cursor = (0, 0);
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
        self.cursor = (line, column);
        Ok(())
    }

    async fn print(&mut self, text: &str) -> Result<()> {
        let (line, mut column) = self.cursor;
        for c in text.chars() {
            if column >= DISPLAY_COLUMNS {
                break;
            }
            self.cells[line][column] = c;
            column += 1;
        }
        self.cursor = (line, column.min(DISPLAY_COLUMNS - 1));
        if line == DISPLAY_LINES - 1 {
            self.flush_if_changed();
        }
        Ok(())
    }
}

/// Lock actuator that reports state changes through the log.
pub struct TerminalActuator {
    engaged: Option<bool>,
}

impl TerminalActuator {
    pub fn new() -> Self {
        Self { engaged: None }
    }
}

impl Default for TerminalActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl LockActuator for TerminalActuator {
    async fn set_engaged(&mut self, engaged: bool) -> Result<()> {
        if self.engaged != Some(engaged) {
            if engaged {
                tracing::info!("Lock actuator engaged, latch open");
            } else {
                tracing::info!("Lock actuator disengaged, latch closed");
            }
            self.engaged = Some(engaged);
        }
        Ok(())
    }
}

//! Deadbolt demo binary.
//!
//! Runs the full controller against mock keypad pins and a
//! terminal-backed display/actuator. Keypad input is typed on stdin:
//! each character of a line is pressed and released on the mock matrix,
//! goes through the real scanner (debounce included), and reaches the
//! controller exactly as it would from hardware.
//!
//! ```text
//! $ deadbolt [credential-file]
//! 123456        # enter the PIN (factory default 000000)
//! *778899       # change it while unlocked
//! #             # relock
//! ```

mod terminal;

use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

use deadbolt_core::Key;
use deadbolt_device::{AuthStateMachine, Device};
use deadbolt_hardware::mock::MockMatrix;
use deadbolt_hardware::{KeypadScanner, event_channel};
use deadbolt_store::FileCredentialStore;

use terminal::{TerminalActuator, TerminalDisplay};

/// Long enough for the scanner to see a clean press edge and a clean
/// release (several scan periods each).
const KEY_DWELL: Duration = Duration::from_millis(12);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "deadbolt.pin".to_string());
    let store = FileCredentialStore::new(&path);

    let machine = AuthStateMachine::new(store).context("provisioning credential store")?;
    tracing::info!(%path, "Credential store ready");

    let (matrix, keys) = MockMatrix::new();
    let (events_tx, events_rx) = event_channel();
    tokio::spawn(KeypadScanner::new(matrix).run(events_tx));

    let device = Device::new(
        machine,
        TerminalDisplay::new(),
        TerminalActuator::new(),
        events_rx,
    );
    let mut controller = tokio::spawn(device.run());

    println!("Keypad symbols: 0-9 * #  (type a line, press Enter; Ctrl-D quits)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                for c in line.trim().chars() {
                    match Key::from_char(c) {
                        Ok(key) => {
                            keys.press(key);
                            sleep(KEY_DWELL).await;
                            keys.release(key);
                            sleep(KEY_DWELL).await;
                        }
                        Err(_) => tracing::warn!(symbol = %c, "Not a keypad symbol, skipping"),
                    }
                }
            }
            result = &mut controller => {
                // The controller only stops on a fatal error.
                return result.context("controller task")?.context("controller stopped");
            }
        }
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}

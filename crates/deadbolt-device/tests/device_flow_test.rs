//! Integration tests for the end-to-end control loop.
//!
//! These tests drive a complete [`Device`] (state machine, display,
//! actuator, credential store) under tokio's paused clock, so the
//! 50 ms refresh and the multi-second cooldowns elapse in virtual time.
//! Key events are injected directly at the channel seam the scanner
//! normally feeds; the scanner's sweep and debounce behavior has its own
//! tests in `deadbolt-hardware`.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use deadbolt_core::{Key, KeyEvent};
use deadbolt_device::{AuthStateMachine, Device, DeviceError, DeviceResult};
use deadbolt_hardware::event_channel;
use deadbolt_hardware::mock::{MockActuator, MockActuatorHandle, MockDisplay, MockDisplayHandle};
use deadbolt_store::{MemoryCredentialStore, StoreError};

struct Rig {
    keys: mpsc::Sender<KeyEvent>,
    screen: MockDisplayHandle,
    latch: MockActuatorHandle,
    store: MemoryCredentialStore,
    task: JoinHandle<DeviceResult<()>>,
}

/// Assemble a running device around the given stored record.
fn rig(record: [u8; 6]) -> Rig {
    let store = MemoryCredentialStore::with_record(record);
    let machine = AuthStateMachine::new(store.clone()).expect("provisioning succeeds");
    let (display, screen) = MockDisplay::new();
    let (actuator, latch) = MockActuator::new();
    let (keys, events) = event_channel();

    let task = tokio::spawn(Device::new(machine, display, actuator, events).run());

    Rig {
        keys,
        screen,
        latch,
        store,
        task,
    }
}

async fn press(keys: &mpsc::Sender<KeyEvent>, sequence: &str) {
    for c in sequence.chars() {
        let key = Key::from_char(c).expect("test sequence uses keypad symbols");
        keys.send(KeyEvent::new(key)).await.expect("channel open");
    }
}

/// One refresh period plus slack, so the loop has run at least once.
async fn settle() {
    sleep(Duration::from_millis(60)).await;
}

#[tokio::test(start_paused = true)]
async fn test_boot_renders_locked_prompt() {
    let rig = rig(*b"123456");

    settle().await;
    assert_eq!(rig.screen.frame(), ("ENTER PIN:".into(), String::new()));
    assert!(!rig.latch.is_engaged());
}

#[tokio::test(start_paused = true)]
async fn test_entered_digits_echo_on_display() {
    let rig = rig(*b"123456");

    press(&rig.keys, "12").await;
    settle().await;

    assert_eq!(rig.screen.frame(), ("ENTER PIN:".into(), "12".into()));
}

#[tokio::test(start_paused = true)]
async fn test_correct_pin_unlocks_and_engages_latch() {
    let rig = rig(*b"123456");

    press(&rig.keys, "123456").await;
    settle().await;

    assert_eq!(
        rig.screen.frame(),
        ("UNLOCKED".into(), "#-LOCK *-NEW PIN".into())
    );
    assert!(rig.latch.is_engaged());
}

#[tokio::test(start_paused = true)]
async fn test_wrong_pin_holds_error_then_relocks() {
    let rig = rig(*b"123456");

    press(&rig.keys, "654321").await;
    settle().await;

    assert_eq!(rig.screen.frame(), ("ERROR!".into(), "TRY AGAIN!".into()));
    assert!(!rig.latch.is_engaged());

    // Keys pressed during the hold are discarded, not buffered.
    press(&rig.keys, "99").await;

    sleep(Duration::from_millis(3000)).await;
    assert_eq!(rig.screen.frame(), ("ENTER PIN:".into(), String::new()));
    assert!(!rig.latch.is_engaged());

    // The stored code still unlocks afterwards.
    press(&rig.keys, "123456").await;
    settle().await;
    assert!(rig.latch.is_engaged());
}

#[tokio::test(start_paused = true)]
async fn test_hash_relocks_and_disengages_on_next_render() {
    let rig = rig(*b"123456");

    press(&rig.keys, "123456").await;
    settle().await;
    assert!(rig.latch.is_engaged());

    press(&rig.keys, "#").await;
    settle().await;

    assert_eq!(rig.screen.frame(), ("ENTER PIN:".into(), String::new()));
    assert!(!rig.latch.is_engaged());
}

#[tokio::test(start_paused = true)]
async fn test_pin_change_persists_and_returns_to_unlocked() {
    let rig = rig(*b"123456");

    press(&rig.keys, "123456").await;
    settle().await;

    press(&rig.keys, "*").await;
    settle().await;
    assert_eq!(rig.screen.frame(), ("NEW PIN:".into(), String::new()));
    // The latch closes for the duration of the change.
    assert!(!rig.latch.is_engaged());

    press(&rig.keys, "778899").await;
    settle().await;
    assert_eq!(
        rig.screen.frame(),
        ("NEW PIN SET!".into(), "PIN:778899".into())
    );
    assert_eq!(rig.store.raw(), *b"778899");

    sleep(Duration::from_millis(2000)).await;
    assert_eq!(
        rig.screen.frame(),
        ("UNLOCKED".into(), "#-LOCK *-NEW PIN".into())
    );
    assert!(rig.latch.is_engaged());
}

#[tokio::test(start_paused = true)]
async fn test_aborted_pin_change_relocks_without_saving() {
    let rig = rig(*b"123456");

    press(&rig.keys, "123456*42#").await;
    settle().await;

    assert_eq!(rig.screen.frame(), ("ENTER PIN:".into(), String::new()));
    assert!(!rig.latch.is_engaged());
    assert_eq!(rig.store.raw(), *b"123456");
}

#[tokio::test(start_paused = true)]
async fn test_actuator_reasserted_every_cycle() {
    let rig = rig(*b"123456");

    settle().await;
    let before = rig.latch.assertions();

    // No input, no state change: the output is still written each cycle.
    sleep(Duration::from_millis(500)).await;
    let after = rig.latch.assertions();

    assert!(after >= before + 5, "expected repeated assertions, got {before} then {after}");
    assert!(!rig.latch.is_engaged());
}

#[tokio::test(start_paused = true)]
async fn test_failed_save_stops_the_controller() {
    let rig = rig(*b"123456");

    press(&rig.keys, "123456*").await;
    settle().await;

    rig.store.set_fail_writes(true);
    press(&rig.keys, "778899").await;
    settle().await;

    let result = rig.task.await.expect("task not cancelled");
    assert!(matches!(
        result,
        Err(DeviceError::Store(StoreError::WriteRejected(_)))
    ));
    // The stored record was never clobbered.
    assert_eq!(rig.store.raw(), *b"123456");
}

#[tokio::test(start_paused = true)]
async fn test_loop_ends_cleanly_when_scanner_goes_away() {
    let rig = rig(*b"123456");

    settle().await;
    drop(rig.keys);
    settle().await;

    let result = rig.task.await.expect("task not cancelled");
    assert!(result.is_ok());
}

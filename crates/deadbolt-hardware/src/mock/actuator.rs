//! Mock lock actuator for testing and development.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::Result;
use crate::traits::LockActuator;

#[derive(Debug, Default)]
struct Coil {
    engaged: AtomicBool,
    assertions: AtomicUsize,
}

/// Mock lock actuator.
///
/// Records the driven output and counts how many times it was asserted,
/// so tests can verify both the final state and that the controller
/// re-asserts the output every render cycle.
///
/// # Examples
///
/// ```
/// use deadbolt_hardware::mock::MockActuator;
/// use deadbolt_hardware::traits::LockActuator;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> deadbolt_hardware::Result<()> {
/// let (mut actuator, handle) = MockActuator::new();
/// assert!(!handle.is_engaged());
///
/// actuator.set_engaged(true).await?;
/// assert!(handle.is_engaged());
/// assert_eq!(handle.assertions(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MockActuator {
    coil: Arc<Coil>,
}

impl MockActuator {
    /// Create a disengaged mock actuator and its observation handle.
    pub fn new() -> (Self, MockActuatorHandle) {
        let coil = Arc::new(Coil::default());
        let actuator = Self {
            coil: Arc::clone(&coil),
        };
        (actuator, MockActuatorHandle { coil })
    }
}

impl LockActuator for MockActuator {
    async fn set_engaged(&mut self, engaged: bool) -> Result<()> {
        self.coil.engaged.store(engaged, Ordering::SeqCst);
        self.coil.assertions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Handle for observing a [`MockActuator`].
///
/// Can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockActuatorHandle {
    coil: Arc<Coil>,
}

impl MockActuatorHandle {
    /// Whether the latch is currently driven open.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.coil.engaged.load(Ordering::SeqCst)
    }

    /// Total number of `set_engaged` calls observed.
    #[must_use]
    pub fn assertions(&self) -> usize {
        self.coil.assertions.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tracks_state_and_assertions() {
        let (mut actuator, handle) = MockActuator::new();

        actuator.set_engaged(true).await.unwrap();
        actuator.set_engaged(true).await.unwrap();
        actuator.set_engaged(false).await.unwrap();

        assert!(!handle.is_engaged());
        assert_eq!(handle.assertions(), 3);
    }
}

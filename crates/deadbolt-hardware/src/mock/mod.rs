//! Mock peripheral implementations for testing and development.
//!
//! Each mock comes as a device/handle pair: the device half implements
//! the corresponding capability trait and is handed to the scanner or
//! controller, while the cloneable handle half stays with the test (or
//! demo harness) to inject input and observe output.

mod actuator;
mod display;
mod matrix;

pub use actuator::{MockActuator, MockActuatorHandle};
pub use display::{MockDisplay, MockDisplayHandle};
pub use matrix::{MockMatrix, MockMatrixHandle};

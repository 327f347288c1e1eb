//! Device subsystem for gamepad state access
//!
//! Abstracts "read one snapshot of raw controller state" behind the
//! [`reader::DeviceReader`] capability:
//!
//! 1. [`snapshot`] - Input identifiers and immutable per-tick captures
//! 2. [`reader`] - The polling capability and its error contract
//! 3. [`gamepad`] - gilrs-backed implementation for real hardware
//!
//! # Architecture
//!
//! ```text
//! Gamepad ──► GamepadReader::poll() ──► DeviceSnapshot
//!             (non-blocking)            (buttons + raw axes)
//! ```

pub mod gamepad;
pub mod reader;
pub mod snapshot;

pub use gamepad::GamepadReader;
pub use reader::{DeviceError, DeviceReader};
pub use snapshot::{DeviceSnapshot, InputCode};

//! combomap - real-time gamepad-to-action mapping engine
//!
//! Polls a controller at a fixed cadence, tracks which inputs are held,
//! detects multi-input combos that must be held for a minimum duration and
//! dispatches each configured action exactly once per satisfied hold.
//!
//! ```text
//! DeviceReader ──► normalize ──► InputTracker ──► ComboDetector ──► ActionDispatcher
//!   (snapshot)     (deadzone)    (active set)     (hold timers)      (registry)
//! ```

pub mod combo;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod events;
pub mod input;
pub mod session;

pub use combo::{ComboDetector, HoldState};
pub use config::{ActionParams, ComboDefinition, ConfigError, MapperConfig, SingleMapping};
pub use device::{DeviceError, DeviceReader, DeviceSnapshot, GamepadReader, InputCode};
pub use dispatch::{ActionDispatcher, ActionRegistry, DispatchError};
pub use events::SessionEvent;
pub use input::{interpret, normalize, AxisTuning, InputEvent, InputTracker};
pub use session::{PollingSession, SessionError, SessionHandle, SessionSettings, TickOutcome};

//! Input interpretation: axis normalization and held-input tracking
//!
//! ```text
//! DeviceSnapshot ──► interpret ──► [InputEvent] ──► InputTracker
//!                    (normalize)                    (active set + rising edges)
//! ```

pub mod axis;
pub mod tracker;

pub use axis::{normalize, AxisTuning};
pub use tracker::{interpret, InputEvent, InputTracker};

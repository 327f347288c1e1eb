//! Structured events emitted by a polling session
//!
//! The session reports what happened on an mpsc channel instead of doing
//! any presentation itself; the host application decides what to show.

use chrono::{DateTime, Local};

use crate::device::InputCode;

/// Observability event, one per notable occurrence inside a session
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// A combo completed its hold and dispatched
    ComboFired {
        name: String,
        action: String,
        held_for: f64,
        timestamp: DateTime<Local>,
    },

    /// A single mapping fired on a rising edge
    MappingFired {
        input: InputCode,
        action: String,
        timestamp: DateTime<Local>,
    },

    /// A poll exceeded the tick budget; this tick's update was skipped
    TickMiss {
        elapsed_ms: f64,
        timestamp: DateTime<Local>,
    },

    /// The device reader failed; the session disables itself
    DeviceFault {
        detail: String,
        timestamp: DateTime<Local>,
    },

    /// One action invocation failed; sibling dispatches were unaffected
    DispatchFailed {
        action: String,
        detail: String,
        timestamp: DateTime<Local>,
    },

    /// The session stopped and released its timer
    Stopped {
        reason: String,
        timestamp: DateTime<Local>,
    },
}

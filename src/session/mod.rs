//! Polling session: the per-tick pipeline and its lifecycle
//!
//! 1. [`polling`] - The session state machine and tick pipeline
//! 2. [`handle`] - Fixed-cadence tokio driver with graceful shutdown
//!
//! # Architecture
//!
//! ```text
//! DeviceReader ──► InputTracker ──► ComboDetector ──► ActionDispatcher
//!      (poll)       (active set)     (hold timers)      (invoke)
//!                         │
//!                    SessionEvent channel (observability)
//! ```
//!
//! One tick runs the pipeline strictly in that order; combos are evaluated
//! in definition order and same-tick dispatches execute sequentially in
//! that same order.

pub mod handle;
pub mod polling;

pub use handle::SessionHandle;
pub use polling::{PollingSession, TickOutcome};

use crate::config::ConfigError;
use crate::device::DeviceError;

/// Cadence settings for the polling loop
#[derive(Clone, Debug)]
pub struct SessionSettings {
    /// Tick interval in milliseconds (16 ms ≈ 60 Hz)
    pub tick_interval_ms: u64,

    /// Poll duration above which a tick is treated as missed
    pub tick_budget_ms: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
            tick_budget_ms: 16.0,
        }
    }
}

// Session errors: fatal to starting or continuing a session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Task error: {0}")]
    Thread(String),
}

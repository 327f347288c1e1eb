//! Combo detection: hold timers over the active-input set
//!
//! ```text
//! ActiveInputSet ──► ComboDetector::advance(now) ──► fired combo indices
//!                    (Idle → Holding → Fired)
//! ```
//!
//! Time is an externally supplied monotonic `now` in seconds, which keeps
//! detection deterministic and testable without real waiting.

pub mod detector;

pub use detector::{ComboDetector, HoldState};

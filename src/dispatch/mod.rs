//! Action dispatch: resolving action ids to handlers and invoking them
//!
//! 1. [`registry`] - Action-id to handler mapping, validated at load time
//! 2. [`dispatcher`] - Per-invocation failure isolation around the registry
//!
//! A failed invocation is logged and reported; it never aborts the tick or
//! affects sibling combos and mappings.

pub mod dispatcher;
pub mod registry;

pub use dispatcher::ActionDispatcher;
pub use registry::ActionRegistry;

// Dispatch errors, always recovered locally
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Unknown action id: {0}")]
    UnknownAction(String),

    #[error("Invalid parameters for '{action}': {detail}")]
    InvalidParams { action: String, detail: String },

    #[error("Action '{action}' failed: {detail}")]
    ExecutionFailed { action: String, detail: String },
}

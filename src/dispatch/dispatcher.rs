use chrono::Local;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::ActionParams;
use crate::dispatch::registry::ActionRegistry;
use crate::events::SessionEvent;

/// Invokes actions with per-invocation failure isolation
///
/// Wraps the registry together with the session's observability channel.
/// A failing handler is logged and reported as a [`SessionEvent::DispatchFailed`];
/// it never escalates into the tick, so one bad action cannot starve
/// sibling combos or mappings.
pub struct ActionDispatcher {
    registry: ActionRegistry,
    event_sender: mpsc::Sender<SessionEvent>,
}

impl ActionDispatcher {
    pub fn new(registry: ActionRegistry, event_sender: mpsc::Sender<SessionEvent>) -> Self {
        Self {
            registry,
            event_sender,
        }
    }

    /// Whether an action id resolves to a registered handler
    pub fn resolves(&self, action_id: &str) -> bool {
        self.registry.contains(action_id)
    }

    /// Invokes one action, isolating any failure
    ///
    /// Returns whether the invocation succeeded; the failure itself has
    /// already been logged and reported when this returns `false`.
    pub fn dispatch(&mut self, action_id: &str, params: &ActionParams) -> bool {
        match self.registry.invoke(action_id, params) {
            Ok(()) => {
                debug!("Dispatched action '{}'", action_id);
                true
            }
            Err(e) => {
                warn!("Dispatch of '{}' failed: {}", action_id, e);
                let event = SessionEvent::DispatchFailed {
                    action: action_id.to_string(),
                    detail: e.to_string(),
                    timestamp: Local::now(),
                };
                if let Err(send_err) = self.event_sender.try_send(event) {
                    debug!("Event channel unavailable: {}", send_err);
                }
                false
            }
        }
    }
}

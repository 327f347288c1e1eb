use std::collections::HashMap;
use tracing::debug;

use crate::config::ActionParams;
use crate::dispatch::DispatchError;

/// Invocable handler behind an action id
pub type ActionHandler = Box<dyn FnMut(&ActionParams) -> Result<(), DispatchError> + Send>;

/// Maps stable action-id strings to invocable handlers
///
/// The host application registers its effects here ("select", "undo",
/// "pan-view", ...) before a session starts; profile action ids are
/// resolved against the registry at configuration load time, not at
/// dispatch time.
#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, ActionHandler>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under an action id, replacing any previous one
    pub fn register(
        &mut self,
        action_id: impl Into<String>,
        handler: impl FnMut(&ActionParams) -> Result<(), DispatchError> + Send + 'static,
    ) {
        let action_id = action_id.into();
        debug!("Registered action handler: {}", action_id);
        self.handlers.insert(action_id, Box::new(handler));
    }

    pub fn contains(&self, action_id: &str) -> bool {
        self.handlers.contains_key(action_id)
    }

    /// Invokes the handler registered for `action_id`
    pub fn invoke(&mut self, action_id: &str, params: &ActionParams) -> Result<(), DispatchError> {
        let handler = self
            .handlers
            .get_mut(action_id)
            .ok_or_else(|| DispatchError::UnknownAction(action_id.to_string()))?;
        handler(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn invokes_registered_handler_with_params() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_inner = Arc::clone(&seen);

        let mut registry = ActionRegistry::new();
        registry.register("select", move |params| {
            assert_eq!(params.get("extend").and_then(|v| v.as_bool()), Some(true));
            seen_inner.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let mut params = ActionParams::new();
        params.insert("extend".to_string(), toml::Value::Boolean(true));

        assert!(registry.contains("select"));
        registry.invoke("select", &params).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_action_is_an_error() {
        let mut registry = ActionRegistry::new();
        let err = registry.invoke("missing", &ActionParams::new()).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownAction(id) if id == "missing"));
    }
}

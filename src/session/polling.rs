use chrono::Local;
use statum::{machine, state};
use std::collections::HashSet;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::combo::{ComboDetector, HoldState};
use crate::config::{ConfigError, MapperConfig};
use crate::device::{DeviceReader, InputCode};
use crate::dispatch::{ActionDispatcher, ActionRegistry};
use crate::events::SessionEvent;
use crate::input::{interpret, InputTracker};
use crate::session::{SessionError, SessionSettings};

// Define session states using statum's state macro
#[state]
#[derive(Debug, Clone)]
pub enum SessionState {
    Ready,
    Running,
    Stopped,
}

/// Result of one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep ticking
    Continue,

    /// The session disabled itself (device fault); no further tick may run
    Disabled,
}

/// The polling session: owns configuration, the active-input set and all
/// per-combo runtime state
///
/// Exactly one active-input set exists per session, mutated only from the
/// polling loop. Configuration is read-only while the session runs; a swap
/// is applied by the driving loop between ticks, never mid-evaluation.
///
/// The session is deliberately clock-agnostic: `tick` takes the current
/// monotonic time in seconds from the caller, so the whole pipeline can be
/// driven from a test without real waiting.
#[machine]
pub struct PollingSession<S: SessionState> {
    reader: Box<dyn DeviceReader>,
    dispatcher: ActionDispatcher,
    config: MapperConfig,
    settings: SessionSettings,
    tracker: InputTracker,
    detector: ComboDetector,
    event_sender: mpsc::Sender<SessionEvent>,
}

// Methods available in all states
impl<S: SessionState> PollingSession<S> {
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Inputs currently considered held
    pub fn active_inputs(&self) -> &HashSet<InputCode> {
        self.tracker.active()
    }

    /// Hold state of the combo at `idx` in definition order
    pub fn combo_state(&self, idx: usize) -> HoldState {
        self.detector.state(idx)
    }

    fn send_event(&self, event: SessionEvent) {
        if let Err(e) = self.event_sender.try_send(event) {
            debug!("Event channel unavailable: {}", e);
        }
    }
}

// Checks every referenced action id against the registered handlers
fn validate_actions(
    config: &MapperConfig,
    resolves: &dyn Fn(&str) -> bool,
) -> Result<(), ConfigError> {
    for combo in &config.combos {
        if !resolves(&combo.action) {
            return Err(ConfigError::UnknownAction {
                referrer: format!("combo '{}'", combo.name),
                action: combo.action.clone(),
            });
        }
    }
    for mapping in &config.mappings {
        if !resolves(&mapping.action) {
            return Err(ConfigError::UnknownAction {
                referrer: format!("mapping '{}'", mapping.input),
                action: mapping.action.clone(),
            });
        }
    }
    Ok(())
}

impl PollingSession<Ready> {
    /// Validates the profile against the registry and builds the session
    ///
    /// Range and shape checks plus action-id resolution all happen here;
    /// nothing is re-validated on the poll path.
    pub fn create(
        reader: Box<dyn DeviceReader>,
        registry: ActionRegistry,
        config: MapperConfig,
        settings: SessionSettings,
        event_sender: mpsc::Sender<SessionEvent>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_actions(&config, &|id| registry.contains(id))?;
        info!(
            "Creating polling session: {} combos, {} mappings",
            config.combos.len(),
            config.mappings.len()
        );

        let detector = ComboDetector::new(config.combos.clone());
        let dispatcher = ActionDispatcher::new(registry, event_sender.clone());

        Ok(Self::new(
            reader,
            dispatcher,
            config,
            settings,
            InputTracker::new(),
            detector,
            event_sender,
        ))
    }

    /// Probes the device once and enters the running state
    ///
    /// With no controller present the session never starts; the caller gets
    /// one clear error and controller mode is not entered.
    pub fn start(mut self) -> Result<PollingSession<Running>, SessionError> {
        match self.reader.poll() {
            Ok(_) => {
                info!("Device probe successful, session running");
                Ok(self.transition())
            }
            Err(e) => {
                error!("Cannot start session: {}", e);
                Err(SessionError::Device(e))
            }
        }
    }
}

impl PollingSession<Running> {
    /// Runs one poll-evaluate-dispatch cycle at monotonic time `now`
    ///
    /// Pipeline order within the tick is fixed: device poll, tick-budget
    /// check, input tracking, single mappings on rising edges (profile
    /// order), combo evaluation (definition order), sequential dispatch.
    ///
    /// A poll that overruns the budget counts as a tick miss: one event is
    /// emitted and the previous active set and combo states are retained
    /// unchanged. A poll error emits exactly one device fault event, leaves
    /// all state untouched and disables the session.
    pub fn tick(&mut self, now: f64) -> TickOutcome {
        let poll_started = Instant::now();
        let snapshot = match self.reader.poll() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Device fault, disabling session: {}", e);
                self.send_event(SessionEvent::DeviceFault {
                    detail: e.to_string(),
                    timestamp: Local::now(),
                });
                return TickOutcome::Disabled;
            }
        };

        let elapsed_ms = poll_started.elapsed().as_secs_f64() * 1000.0;
        if elapsed_ms > self.settings.tick_budget_ms {
            warn!("Poll took {:.1}ms, skipping tick", elapsed_ms);
            self.send_event(SessionEvent::TickMiss {
                elapsed_ms,
                timestamp: Local::now(),
            });
            return TickOutcome::Continue;
        }

        let events = interpret(&snapshot, &self.config.tuning);
        let rising = self.tracker.apply(&events);

        // Single mappings trigger on rising edges, in profile order
        for mapping in &self.config.mappings {
            if rising.contains(&mapping.input) {
                debug!("Mapping '{}' triggered", mapping.input);
                self.send_event(SessionEvent::MappingFired {
                    input: mapping.input.clone(),
                    action: mapping.action.clone(),
                    timestamp: Local::now(),
                });
                self.dispatcher.dispatch(&mapping.action, &mapping.params);
            }
        }

        // Combos evaluate and dispatch in definition order
        let fired = self.detector.advance(self.tracker.active(), now);
        for idx in fired {
            let held_for = match self.detector.state(idx) {
                HoldState::Fired { since } => now - since,
                _ => 0.0,
            };
            let def = self.detector.definition(idx);
            self.send_event(SessionEvent::ComboFired {
                name: def.name.clone(),
                action: def.action.clone(),
                held_for,
                timestamp: Local::now(),
            });
            self.dispatcher.dispatch(&def.action, &def.params);
        }

        TickOutcome::Continue
    }

    /// Replaces the profile between ticks
    ///
    /// Validates the incoming profile first; on rejection the old profile
    /// stays in effect. A successful swap resets the active set and every
    /// combo to idle, so no state from the old profile leaks into the new.
    pub fn swap_config(&mut self, config: MapperConfig) -> Result<(), ConfigError> {
        config.validate()?;
        validate_actions(&config, &|id| self.dispatcher.resolves(id))?;

        info!(
            "Applying config swap: {} combos, {} mappings",
            config.combos.len(),
            config.mappings.len()
        );
        self.detector = ComboDetector::new(config.combos.clone());
        self.tracker.reset();
        self.config = config;
        Ok(())
    }

    /// Stops the session, discarding all runtime state
    pub fn stop(self, reason: &str) -> PollingSession<Stopped> {
        info!("Session stopped: {}", reason);
        self.send_event(SessionEvent::Stopped {
            reason: reason.to_string(),
            timestamp: Local::now(),
        });
        self.transition()
    }
}

impl PollingSession<Stopped> {}

//! Session Handle - fixed-cadence driver for a polling session
//!
//! Owns the tokio task that ticks a [`PollingSession`] at the configured
//! cadence (~60 Hz by default), supplies it with monotonic time, applies
//! pending config swaps between ticks and handles graceful shutdown. The
//! session core itself stays free of timers and tasks, so the same pipeline
//! runs identically under a test driver.

use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::MapperConfig;
use crate::device::DeviceReader;
use crate::dispatch::ActionRegistry;
use crate::events::SessionEvent;
use crate::session::polling::{PollingSession, Running, TickOutcome};
use crate::session::{SessionError, SessionSettings};

/// Handle for a polling session running in a background task
///
/// Dropping the handle leaves the task running; call [`shutdown`] for a
/// clean stop. An in-flight tick always completes before the stop signal
/// is honored, so dispatches are never cut off halfway.
///
/// [`shutdown`]: SessionHandle::shutdown
pub struct SessionHandle {
    task_handle: Option<JoinHandle<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    config_tx: watch::Sender<Option<MapperConfig>>,
}

impl SessionHandle {
    /// Validates, probes and spawns the polling loop
    ///
    /// Validation and the device probe run synchronously here, so a missing
    /// controller or a broken profile is reported before any task exists.
    pub fn spawn(
        reader: Box<dyn DeviceReader>,
        registry: ActionRegistry,
        config: MapperConfig,
        settings: SessionSettings,
        event_sender: mpsc::Sender<SessionEvent>,
    ) -> Result<Self, SessionError> {
        let session =
            PollingSession::create(reader, registry, config, settings.clone(), event_sender)?;
        let running = session.start()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (config_tx, config_rx) = watch::channel(None);

        info!(
            "Spawning polling loop at {}ms cadence",
            settings.tick_interval_ms
        );
        let task_handle = tokio::spawn(run_loop(running, settings, shutdown_rx, config_rx));

        Ok(Self {
            task_handle: Some(task_handle),
            shutdown_tx: Some(shutdown_tx),
            config_tx,
        })
    }

    /// Hands a new profile to the loop, applied between ticks
    pub fn swap_config(&self, config: MapperConfig) -> Result<(), SessionError> {
        self.config_tx
            .send(Some(config))
            .map_err(|e| SessionError::Channel(format!("session loop gone: {e}")))
    }

    /// Signals the loop to stop and waits for the task to finish
    pub async fn shutdown(&mut self) -> Result<(), SessionError> {
        debug!("Sending shutdown signal to session loop");
        if let Some(tx) = self.shutdown_tx.take() {
            if tx.send(()).is_err() {
                warn!("Session task already terminated");
            }
        }

        if let Some(handle) = self.task_handle.take() {
            handle
                .await
                .map_err(|e| SessionError::Thread(format!("session task panicked: {e}")))?;
            debug!("Session task completed");
        }
        Ok(())
    }
}

async fn run_loop(
    mut session: PollingSession<Running>,
    settings: SessionSettings,
    mut shutdown_rx: oneshot::Receiver<()>,
    mut config_rx: watch::Receiver<Option<MapperConfig>>,
) {
    let origin = Instant::now();
    let mut ticker = interval(Duration::from_millis(settings.tick_interval_ms.max(1)));
    // A stalled loop must not replay a burst of catch-up ticks
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let reason;
    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                reason = "stop requested";
                break;
            }

            _ = ticker.tick() => {
                // Pending swaps are applied here, between ticks only
                if config_rx.has_changed().unwrap_or(false) {
                    let pending = config_rx.borrow_and_update().clone();
                    if let Some(config) = pending {
                        if let Err(e) = session.swap_config(config) {
                            error!("Rejected config swap, keeping old profile: {}", e);
                        }
                    }
                }

                let now = origin.elapsed().as_secs_f64();
                if session.tick(now) == TickOutcome::Disabled {
                    reason = "device fault";
                    break;
                }
            }
        }
    }

    let _stopped = session.stop(reason);
}

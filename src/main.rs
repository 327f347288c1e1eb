use color_eyre::{eyre::eyre, Result};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use combomap::{
    ActionRegistry, GamepadReader, MapperConfig, SessionEvent, SessionHandle, SessionSettings,
};

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config = load_profile()?;
    let registry = demo_registry();

    let (event_sender, mut event_receiver) = mpsc::channel(100);

    info!("Initializing gamepad reader");
    let reader = GamepadReader::new().map_err(|e| eyre!("Controller not found: {e}"))?;

    let mut session = SessionHandle::spawn(
        Box::new(reader),
        registry,
        config,
        SessionSettings::default(),
        event_sender,
    )
    .map_err(|e| eyre!("Failed to start polling session: {e}"))?;

    // Drain session events into the log until the channel closes
    let event_task = tokio::spawn(async move {
        while let Some(event) = event_receiver.recv().await {
            match event {
                SessionEvent::ComboFired {
                    name, held_for, ..
                } => info!("Combo '{}' fired after {:.2}s", name, held_for),
                SessionEvent::MappingFired { input, action, .. } => {
                    info!("Mapping {} -> {}", input, action)
                }
                SessionEvent::TickMiss { elapsed_ms, .. } => {
                    warn!("Tick missed, poll took {:.1}ms", elapsed_ms)
                }
                SessionEvent::DeviceFault { detail, .. } => {
                    warn!("Device fault: {}", detail)
                }
                SessionEvent::DispatchFailed { action, detail, .. } => {
                    warn!("Dispatch of '{}' failed: {}", action, detail)
                }
                SessionEvent::Stopped { reason, .. } => info!("Session stopped: {}", reason),
            }
        }
    });

    info!("Controller mode active, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    session
        .shutdown()
        .await
        .map_err(|e| eyre!("Shutdown failed: {e}"))?;
    let _ = event_task.await;

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

// Profile resolution: CLI arg, working directory, user config dir, builtin
fn load_profile() -> Result<MapperConfig> {
    if let Some(arg) = std::env::args().nth(1) {
        return MapperConfig::load(Path::new(&arg)).map_err(|e| eyre!("Invalid profile: {e}"));
    }

    let local = Path::new("combomap.toml");
    if local.exists() {
        return MapperConfig::load(local).map_err(|e| eyre!("Invalid profile: {e}"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("combomap").join("combomap.toml");
        if path.exists() {
            return MapperConfig::load(&path).map_err(|e| eyre!("Invalid profile: {e}"));
        }
    }

    info!("No profile found, using built-in defaults");
    Ok(MapperConfig::default_profile())
}

// Stand-in action handlers; a host application registers its real effects here
fn demo_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();

    registry.register("select", |params| {
        let extend = params.get("extend").and_then(|v| v.as_bool()).unwrap_or(false);
        info!("Action: select (extend={})", extend);
        Ok(())
    });

    registry.register("undo", |params| {
        let steps = params.get("steps").and_then(|v| v.as_integer()).unwrap_or(1);
        info!("Action: undo ({} steps)", steps);
        Ok(())
    });

    registry.register("pan-view", |_| {
        info!("Action: pan-view");
        Ok(())
    });

    registry
}

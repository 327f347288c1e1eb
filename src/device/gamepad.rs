use chrono::Local;
use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::device::reader::{DeviceError, DeviceReader};
use crate::device::snapshot::{DeviceSnapshot, InputCode};

// Full scale of the raw axis range reported in snapshots
const AXIS_RAW_MAX: f32 = 32767.0;

// Buttons captured in every snapshot, with their evdev-style codes
const BUTTON_TABLE: &[(Button, &str)] = &[
    (Button::South, "BTN_SOUTH"),
    (Button::East, "BTN_EAST"),
    (Button::North, "BTN_NORTH"),
    (Button::West, "BTN_WEST"),
    (Button::LeftTrigger, "BTN_TL"),
    (Button::RightTrigger, "BTN_TR"),
    (Button::LeftTrigger2, "BTN_TL2"),
    (Button::RightTrigger2, "BTN_TR2"),
    (Button::Select, "BTN_SELECT"),
    (Button::Start, "BTN_START"),
    (Button::Mode, "BTN_MODE"),
    (Button::LeftThumb, "BTN_THUMBL"),
    (Button::RightThumb, "BTN_THUMBR"),
    (Button::DPadUp, "BTN_DPAD_UP"),
    (Button::DPadDown, "BTN_DPAD_DOWN"),
    (Button::DPadLeft, "BTN_DPAD_LEFT"),
    (Button::DPadRight, "BTN_DPAD_RIGHT"),
];

// Axes captured in every snapshot
const AXIS_TABLE: &[(Axis, &str)] = &[
    (Axis::LeftStickX, "ABS_X"),
    (Axis::LeftStickY, "ABS_Y"),
    (Axis::LeftZ, "ABS_Z"),
    (Axis::RightStickX, "ABS_RX"),
    (Axis::RightStickY, "ABS_RY"),
    (Axis::RightZ, "ABS_RZ"),
];

/// gilrs-backed [`DeviceReader`] for real gamepads
///
/// Pumps the gilrs event queue without blocking, follows the active gamepad
/// across connect/disconnect events, and snapshots the cached button and
/// axis state of that pad. Re-attaches to a newly connected pad on the next
/// successful poll after a disconnect.
pub struct GamepadReader {
    gilrs: Gilrs,
    active_gamepad: Option<GamepadId>,
}

impl GamepadReader {
    pub fn new() -> Result<Self, DeviceError> {
        info!("Initializing gilrs gamepad backend");
        let gilrs = Gilrs::new().map_err(|e| {
            DeviceError::Unavailable(format!("failed to initialize gamepad backend: {e}"))
        })?;

        let active_gamepad = gilrs.gamepads().next().map(|(id, gamepad)| {
            info!("Selected gamepad: {} ({})", gamepad.name(), id);
            id
        });
        if active_gamepad.is_none() {
            warn!("No gamepad connected yet");
        }

        Ok(Self {
            gilrs,
            active_gamepad,
        })
    }

    // Drain queued gilrs events and keep the active gamepad current
    fn pump_events(&mut self) {
        while let Some(event) = self.gilrs.next_event() {
            match event.event {
                EventType::Connected => {
                    if self.active_gamepad.is_none() {
                        info!("Gamepad connected, adopting: {:?}", event.id);
                        self.active_gamepad = Some(event.id);
                    }
                }
                EventType::Disconnected => {
                    if self.active_gamepad == Some(event.id) {
                        warn!("Active gamepad disconnected: {:?}", event.id);
                        self.active_gamepad = None;
                    }
                }
                // State changes land in the cached gamepad state we snapshot from
                other => debug!("Pumped gilrs event: {:?}", other),
            }
        }
    }
}

impl DeviceReader for GamepadReader {
    fn poll(&mut self) -> Result<DeviceSnapshot, DeviceError> {
        self.pump_events();

        // Fall back to any connected pad if we lost the active one
        if self.active_gamepad.is_none() {
            self.active_gamepad = self.gilrs.gamepads().next().map(|(id, _)| id);
        }

        let id = self
            .active_gamepad
            .ok_or_else(|| DeviceError::Unavailable("no gamepad connected".to_string()))?;

        let gamepad = self.gilrs.connected_gamepad(id).ok_or_else(|| {
            self.active_gamepad = None;
            DeviceError::Unavailable(format!("gamepad {id} disconnected"))
        })?;

        let mut buttons = HashMap::with_capacity(BUTTON_TABLE.len());
        for (button, code) in BUTTON_TABLE {
            buttons.insert(InputCode::from(*code), gamepad.is_pressed(*button));
        }

        let mut axes = HashMap::with_capacity(AXIS_TABLE.len());
        for (axis, code) in AXIS_TABLE {
            let raw = (gamepad.value(*axis) * AXIS_RAW_MAX) as i32;
            axes.insert(
                InputCode::from(*code),
                raw.clamp(-(AXIS_RAW_MAX as i32), AXIS_RAW_MAX as i32),
            );
        }

        Ok(DeviceSnapshot {
            buttons,
            axes,
            timestamp: Local::now(),
        })
    }
}

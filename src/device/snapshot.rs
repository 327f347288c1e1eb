use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier for a physical input (a named button or axis)
///
/// Codes use the evdev-style vocabulary (`BTN_SOUTH`, `ABS_X`, ...) so that
/// mapping profiles stay readable and portable across backends. The engine
/// itself treats codes as opaque: any string a reader produces can appear in
/// a profile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputCode(String);

impl InputCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InputCode {
    fn from(code: &str) -> Self {
        Self(code.to_owned())
    }
}

/// Immutable point-in-time capture of raw controller state
///
/// Produced once per poll tick by a [`super::DeviceReader`] and never mutated
/// afterwards. Axis values are raw signed 16-bit-equivalent integers; the
/// normalizer turns them into deadzone-compensated readings later in the
/// pipeline.
#[derive(Clone, Debug)]
pub struct DeviceSnapshot {
    /// Pressed state per button code
    pub buttons: HashMap<InputCode, bool>,

    /// Raw value per axis code, in the i16 range
    pub axes: HashMap<InputCode, i32>,

    /// Capture instant, for observability only
    pub timestamp: DateTime<Local>,
}

impl DeviceSnapshot {
    /// Creates an empty snapshot stamped with the current time
    pub fn empty() -> Self {
        Self {
            buttons: HashMap::new(),
            axes: HashMap::new(),
            timestamp: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_code_deserializes_as_plain_string() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            inputs: Vec<InputCode>,
        }

        let wrapper: Wrapper = toml::from_str(r#"inputs = ["BTN_SOUTH", "ABS_X"]"#).unwrap();
        assert_eq!(wrapper.inputs, vec![InputCode::from("BTN_SOUTH"), InputCode::from("ABS_X")]);
        assert_eq!(wrapper.inputs[0].as_str(), "BTN_SOUTH");
    }

    #[test]
    fn empty_snapshot_has_no_inputs() {
        let snapshot = DeviceSnapshot::empty();
        assert!(snapshot.buttons.is_empty());
        assert!(snapshot.axes.is_empty());
    }
}

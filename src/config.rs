//! Mapping profile: tuning, combo definitions and single mappings
//!
//! A profile is supplied by an external configuration store (in the binary:
//! a TOML file) at session start and stays read-only for the whole session.
//! All range and shape validation happens here, at load time, never on the
//! poll path.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::device::InputCode;
use crate::input::AxisTuning;

/// Opaque key-value payload handed to an action on dispatch
pub type ActionParams = toml::value::Table;

// Configuration errors, all rejected before a session can start
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} out of range: {value} (allowed: {allowed})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        allowed: String,
    },

    #[error("Combo '{0}' has no required inputs")]
    EmptyCombo(String),

    #[error("Combo '{combo}' lists input {input} more than once")]
    DuplicateInput { combo: String, input: InputCode },

    #[error("Combo '{combo}' hold time must be positive, got {value}")]
    NonPositiveHold { combo: String, value: f64 },

    #[error("'{referrer}' references unknown action '{action}'")]
    UnknownAction { referrer: String, action: String },

    #[error("Failed to read profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse profile: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A set of inputs that must be held together to trigger one action
///
/// Input order is irrelevant for matching; the list position of the combo
/// within the profile decides evaluation order. `hold_time` is the minimum
/// continuous hold in seconds before the combo fires.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComboDefinition {
    pub name: String,
    pub inputs: Vec<InputCode>,
    pub action: String,
    #[serde(default)]
    pub params: ActionParams,
    pub hold_time: f64,
}

/// Direct one-input binding, fired on the rising edge of its input
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SingleMapping {
    pub input: InputCode,
    pub action: String,
    #[serde(default)]
    pub params: ActionParams,
}

/// Complete mapping profile consumed by a polling session
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MapperConfig {
    #[serde(default)]
    pub tuning: AxisTuning,

    #[serde(default)]
    pub combos: Vec<ComboDefinition>,

    #[serde(default)]
    pub mappings: Vec<SingleMapping>,
}

impl MapperConfig {
    /// Loads and validates a profile from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading mapping profile from {}", path.display());
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Parses and validates a profile from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        debug!(
            "Parsed profile: {} combos, {} mappings",
            config.combos.len(),
            config.mappings.len()
        );
        Ok(config)
    }

    /// Checks tuning ranges and combo shape
    ///
    /// Action identifiers are resolved separately against the registry when
    /// the session is created.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tuning.validate()?;

        for combo in &self.combos {
            if combo.inputs.is_empty() {
                return Err(ConfigError::EmptyCombo(combo.name.clone()));
            }
            for (idx, input) in combo.inputs.iter().enumerate() {
                if combo.inputs[..idx].contains(input) {
                    return Err(ConfigError::DuplicateInput {
                        combo: combo.name.clone(),
                        input: input.clone(),
                    });
                }
            }
            if combo.hold_time <= 0.0 {
                return Err(ConfigError::NonPositiveHold {
                    combo: combo.name.clone(),
                    value: combo.hold_time,
                });
            }
        }

        Ok(())
    }

    /// Built-in stock profile used when no file is present
    ///
    /// South button selects, both stick axes pan the view, holding both
    /// bumpers for 300 ms undoes.
    pub fn default_profile() -> Self {
        let mut select_params = ActionParams::new();
        select_params.insert("extend".to_string(), toml::Value::Boolean(false));

        let mut undo_params = ActionParams::new();
        undo_params.insert("steps".to_string(), toml::Value::Integer(1));

        Self {
            tuning: AxisTuning::default(),
            combos: vec![ComboDefinition {
                name: "bumper-undo".to_string(),
                inputs: vec![InputCode::from("BTN_TL"), InputCode::from("BTN_TR")],
                action: "undo".to_string(),
                params: undo_params,
                hold_time: 0.3,
            }],
            mappings: vec![
                SingleMapping {
                    input: InputCode::from("BTN_SOUTH"),
                    action: "select".to_string(),
                    params: select_params,
                },
                SingleMapping {
                    input: InputCode::from("ABS_X"),
                    action: "pan-view".to_string(),
                    params: ActionParams::new(),
                },
                SingleMapping {
                    input: InputCode::from("ABS_Y"),
                    action: "pan-view".to_string(),
                    params: ActionParams::new(),
                },
            ],
        }
    }
}

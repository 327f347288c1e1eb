use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

// Raw axis full scale (signed 16-bit-equivalent)
const AXIS_RAW_MAX: f64 = 32767.0;

// Validation bounds, enforced at configuration time
pub const DEADZONE_MAX: f64 = 0.9;
pub const SENSITIVITY_MAX: f64 = 5.0;

/// Deadzone and sensitivity settings applied to every axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisTuning {
    /// Minimum normalized magnitude below which an axis reading is ignored
    pub deadzone: f64,

    /// Scale applied to the deadzone-rescaled magnitude
    pub sensitivity: f64,
}

impl Default for AxisTuning {
    fn default() -> Self {
        Self {
            deadzone: 0.15,
            sensitivity: 1.0,
        }
    }
}

impl AxisTuning {
    /// Checks the tuning against the allowed ranges
    ///
    /// Deadzone must lie in `[0, 0.9)`, sensitivity in `(0, 5.0]`. Values
    /// outside are rejected here so the poll path never has to care.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..DEADZONE_MAX).contains(&self.deadzone) {
            return Err(ConfigError::OutOfRange {
                field: "deadzone",
                value: self.deadzone,
                allowed: format!("0.0 <= deadzone < {DEADZONE_MAX}"),
            });
        }
        if self.sensitivity <= 0.0 || self.sensitivity > SENSITIVITY_MAX {
            return Err(ConfigError::OutOfRange {
                field: "sensitivity",
                value: self.sensitivity,
                allowed: format!("0.0 < sensitivity <= {SENSITIVITY_MAX}"),
            });
        }
        Ok(())
    }
}

/// Normalizes a raw axis value into a deadzone-compensated reading
///
/// Returns `None` while the magnitude, as a fraction of the axis range, does
/// not exceed the deadzone. Otherwise the magnitude is rescaled to start at
/// zero on the deadzone boundary, scaled by sensitivity and clamped to
/// `[-1, 1]`:
///
/// `sign(raw) * sensitivity * (|raw| / 32767 - deadzone) / (1 - deadzone)`
pub fn normalize(raw: i32, deadzone: f64, sensitivity: f64) -> Option<f64> {
    let fraction = (raw as f64 / AXIS_RAW_MAX).clamp(-1.0, 1.0);
    if fraction.abs() <= deadzone {
        return None;
    }

    let magnitude = sensitivity * (fraction.abs() - deadzone) / (1.0 - deadzone);
    Some(fraction.signum() * magnitude.min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(fraction: f64) -> i32 {
        (fraction * AXIS_RAW_MAX).round() as i32
    }

    #[test]
    fn values_inside_deadzone_are_inactive() {
        assert_eq!(normalize(0, 0.2, 1.0), None);
        assert_eq!(normalize(raw(0.1), 0.2, 1.0), None);
        assert_eq!(normalize(raw(-0.19), 0.2, 1.0), None);
        assert_eq!(normalize(raw(0.2), 0.2, 1.0), None);
    }

    #[test]
    fn half_deflection_with_default_sensitivity() {
        // (0.5 - 0.2) / (1 - 0.2) = 0.375
        let value = normalize(raw(0.5), 0.2, 1.0).unwrap();
        assert!((value - 0.375).abs() < 1e-3);
    }

    #[test]
    fn output_is_continuous_at_the_deadzone_boundary() {
        let just_above = normalize(raw(0.201), 0.2, 1.0).unwrap();
        assert!(just_above > 0.0);
        assert!(just_above < 0.01);
    }

    #[test]
    fn output_is_monotonic_in_raw_magnitude() {
        let mut last = 0.0;
        for step in 21..=100 {
            let value = normalize(raw(step as f64 / 100.0), 0.2, 1.0).unwrap();
            assert!(value >= last, "non-monotonic at step {step}");
            last = value;
        }
    }

    #[test]
    fn sign_is_preserved() {
        let value = normalize(raw(-0.5), 0.2, 1.0).unwrap();
        assert!((value + 0.375).abs() < 1e-3);
    }

    #[test]
    fn sensitivity_scales_and_clamps() {
        let scaled = normalize(raw(0.5), 0.2, 2.0).unwrap();
        assert!((scaled - 0.75).abs() < 1e-3);

        // 5x sensitivity pushes past full scale and must clamp, not wrap
        let clamped = normalize(raw(0.9), 0.2, 5.0).unwrap();
        assert!((clamped - 1.0).abs() < 1e-9);
        let clamped_neg = normalize(raw(-0.9), 0.2, 5.0).unwrap();
        assert!((clamped_neg + 1.0).abs() < 1e-9);
    }

    #[test]
    fn full_deflection_maps_to_full_scale() {
        let value = normalize(raw(1.0), 0.2, 1.0).unwrap();
        assert!((value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn tuning_bounds_are_enforced() {
        assert!(AxisTuning::default().validate().is_ok());
        assert!(AxisTuning {
            deadzone: 0.0,
            sensitivity: 5.0
        }
        .validate()
        .is_ok());

        assert!(AxisTuning {
            deadzone: 0.9,
            sensitivity: 1.0
        }
        .validate()
        .is_err());
        assert!(AxisTuning {
            deadzone: -0.1,
            sensitivity: 1.0
        }
        .validate()
        .is_err());
        assert!(AxisTuning {
            deadzone: 0.15,
            sensitivity: 0.0
        }
        .validate()
        .is_err());
        assert!(AxisTuning {
            deadzone: 0.15,
            sensitivity: 5.1
        }
        .validate()
        .is_err());
    }
}

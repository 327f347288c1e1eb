use std::collections::HashSet;
use tracing::debug;

use crate::device::{DeviceSnapshot, InputCode};
use crate::input::axis::{normalize, AxisTuning};

/// Normalized input event derived from one snapshot
///
/// The concrete shape handed from the normalizer to the tracker: a button
/// with its pressed state, or an axis with its deadzone-compensated
/// reading. Axis events exist only while the reading is beyond the
/// deadzone; a centered axis simply produces no event.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Button { code: InputCode, pressed: bool },
    Axis { code: InputCode, value: f64 },
}

/// Turns a raw snapshot into normalized input events
pub fn interpret(snapshot: &DeviceSnapshot, tuning: &AxisTuning) -> Vec<InputEvent> {
    let mut events = Vec::with_capacity(snapshot.buttons.len() + snapshot.axes.len());

    for (code, pressed) in &snapshot.buttons {
        events.push(InputEvent::Button {
            code: code.clone(),
            pressed: *pressed,
        });
    }

    for (code, raw) in &snapshot.axes {
        if let Some(value) = normalize(*raw, tuning.deadzone, tuning.sensitivity) {
            events.push(InputEvent::Axis {
                code: code.clone(),
                value,
            });
        }
    }

    events
}

/// Tracks the set of inputs currently considered held
///
/// Owns the session's single active-input set. Buttons are active while
/// pressed; axes are active while an event for them exists at all. `apply`
/// is a pure function of (previous set, this tick's events) and
/// additionally reports rising edges, which single mappings trigger on.
#[derive(Debug, Default)]
pub struct InputTracker {
    active: HashSet<InputCode>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inputs currently held
    pub fn active(&self) -> &HashSet<InputCode> {
        &self.active
    }

    /// Folds one tick's events into the active set, returning rising edges
    pub fn apply(&mut self, events: &[InputEvent]) -> HashSet<InputCode> {
        let mut next = HashSet::with_capacity(self.active.len());

        for event in events {
            match event {
                InputEvent::Button { code, pressed } => {
                    if *pressed {
                        next.insert(code.clone());
                    }
                }
                InputEvent::Axis { code, .. } => {
                    next.insert(code.clone());
                }
            }
        }

        let rising: HashSet<InputCode> = next.difference(&self.active).cloned().collect();
        if !rising.is_empty() {
            debug!("Rising edges this tick: {:?}", rising);
        }

        self.active = next;
        rising
    }

    /// Drops all held inputs (session restart or config swap)
    pub fn reset(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn snapshot(buttons: &[(&str, bool)], axes: &[(&str, i32)]) -> DeviceSnapshot {
        DeviceSnapshot {
            buttons: buttons
                .iter()
                .map(|(code, pressed)| (InputCode::from(*code), *pressed))
                .collect(),
            axes: axes
                .iter()
                .map(|(code, raw)| (InputCode::from(*code), *raw))
                .collect(),
            timestamp: Local::now(),
        }
    }

    #[test]
    fn interpret_emits_axis_events_only_beyond_deadzone() {
        let tuning = AxisTuning {
            deadzone: 0.2,
            sensitivity: 1.0,
        };

        // 0.5 of full scale is beyond the 0.2 deadzone, 0.1 is not
        let events = interpret(&snapshot(&[], &[("ABS_X", 16384), ("ABS_Y", 3277)]), &tuning);

        assert_eq!(events.len(), 1);
        match &events[0] {
            InputEvent::Axis { code, value } => {
                assert_eq!(code, &InputCode::from("ABS_X"));
                assert!((value - 0.375).abs() < 1e-3);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn pressed_buttons_become_active() {
        let mut tracker = InputTracker::new();
        let events = interpret(
            &snapshot(&[("BTN_SOUTH", true), ("BTN_EAST", false)], &[]),
            &AxisTuning::default(),
        );
        let rising = tracker.apply(&events);

        assert!(tracker.active().contains(&InputCode::from("BTN_SOUTH")));
        assert!(!tracker.active().contains(&InputCode::from("BTN_EAST")));
        assert_eq!(rising.len(), 1);
        assert!(rising.contains(&InputCode::from("BTN_SOUTH")));
    }

    #[test]
    fn axes_are_active_only_beyond_deadzone() {
        let mut tracker = InputTracker::new();
        let tuning = AxisTuning {
            deadzone: 0.2,
            sensitivity: 1.0,
        };

        let events = interpret(&snapshot(&[], &[("ABS_X", 16384), ("ABS_Y", 3277)]), &tuning);
        tracker.apply(&events);

        assert!(tracker.active().contains(&InputCode::from("ABS_X")));
        assert!(!tracker.active().contains(&InputCode::from("ABS_Y")));
    }

    #[test]
    fn rising_edges_fire_only_on_transition() {
        let mut tracker = InputTracker::new();
        let tuning = AxisTuning::default();
        let held = interpret(&snapshot(&[("BTN_SOUTH", true)], &[]), &tuning);
        let released = interpret(&snapshot(&[("BTN_SOUTH", false)], &[]), &tuning);

        let first = tracker.apply(&held);
        assert!(first.contains(&InputCode::from("BTN_SOUTH")));

        // Still held: no new edge
        let second = tracker.apply(&held);
        assert!(second.is_empty());

        // Released, then pressed again: a fresh edge
        tracker.apply(&released);
        assert!(tracker.active().is_empty());
        let third = tracker.apply(&held);
        assert!(third.contains(&InputCode::from("BTN_SOUTH")));
    }

    #[test]
    fn reset_clears_held_inputs() {
        let mut tracker = InputTracker::new();
        let events = interpret(&snapshot(&[("BTN_SOUTH", true)], &[]), &AxisTuning::default());
        tracker.apply(&events);
        tracker.reset();
        assert!(tracker.active().is_empty());
    }
}

use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::ComboDefinition;
use crate::device::InputCode;

/// Per-combo hold tracking
///
/// The timestamp is present exactly while the combo's required inputs are
/// all held. `Fired` keeps the timestamp so the invariant stays visible in
/// logs; the fired flag is the variant itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HoldState {
    Idle,
    Holding { since: f64 },
    Fired { since: f64 },
}

/// Evaluates configured combos against the active-input set
///
/// One state machine per combo, stepped once per tick in definition order:
///
/// * `Idle → Holding` when the required inputs become a subset of the
///   active set; the hold timer starts at the supplied `now`.
/// * `Holding → Fired` once `now - since >= hold_time`; the combo index is
///   reported exactly once, at this transition.
/// * `Holding`/`Fired` `→ Idle` the moment any required input is released;
///   re-satisfying restarts the timer from the new instant.
///
/// Combo states are independent: overlapping combos each fire once their
/// own subset and hold time are met.
pub struct ComboDetector {
    combos: Vec<ComboDefinition>,
    states: Vec<HoldState>,
}

impl ComboDetector {
    pub fn new(combos: Vec<ComboDefinition>) -> Self {
        let states = vec![HoldState::Idle; combos.len()];
        Self { combos, states }
    }

    /// Steps every combo state machine, returning indices fired this tick
    pub fn advance(&mut self, active: &HashSet<InputCode>, now: f64) -> Vec<usize> {
        let mut fired = Vec::new();

        for (idx, combo) in self.combos.iter().enumerate() {
            let satisfied = combo.inputs.iter().all(|input| active.contains(input));
            let state = &mut self.states[idx];

            if !satisfied {
                if *state != HoldState::Idle {
                    debug!("Combo '{}' released, hold timer cleared", combo.name);
                }
                *state = HoldState::Idle;
                continue;
            }

            match *state {
                HoldState::Idle => {
                    debug!("Combo '{}' satisfied, hold timer started at {:.3}", combo.name, now);
                    *state = HoldState::Holding { since: now };
                }
                HoldState::Holding { since } => {
                    if now - since >= combo.hold_time {
                        info!(
                            "Combo '{}' fired after {:.3}s hold",
                            combo.name,
                            now - since
                        );
                        *state = HoldState::Fired { since };
                        fired.push(idx);
                    }
                }
                // Already fired for this hold episode; stays quiet until released
                HoldState::Fired { .. } => {}
            }
        }

        fired
    }

    pub fn definition(&self, idx: usize) -> &ComboDefinition {
        &self.combos[idx]
    }

    pub fn state(&self, idx: usize) -> HoldState {
        self.states[idx]
    }

    pub fn len(&self) -> usize {
        self.combos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    /// Returns every combo to `Idle` (session restart or config swap)
    pub fn reset(&mut self) {
        for state in &mut self.states {
            *state = HoldState::Idle;
        }
    }
}

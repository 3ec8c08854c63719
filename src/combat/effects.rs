//! Temporal effect ledger
//!
//! One slot per effect kind. A slot stores the exact delta applied when the
//! effect started; expiry hands that same delta back for reversal and frees
//! the slot. Re-triggering an active effect only refreshes its countdown, so
//! every activation is applied once and reverted once.

use std::ops::{Add, Neg};

use serde::{Deserialize, Serialize};

use crate::combat::constants::{
    DASH_DURATION, DISENGAGE_DURATION, DODGE_DEFENSE_DELTA, DODGE_DURATION, HIDE_DEFENSE_DELTA,
};

/// Effects that can be active on an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Dodge,
    Dash,
    Disengage,
    Hide,
}

impl EffectKind {
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Dodge,
        EffectKind::Dash,
        EffectKind::Disengage,
        EffectKind::Hide,
    ];

    /// Countdown in the owner's turns; `None` lasts until ended explicitly
    pub fn duration(self) -> Option<u32> {
        match self {
            EffectKind::Dodge => Some(DODGE_DURATION),
            EffectKind::Dash => Some(DASH_DURATION),
            EffectKind::Disengage => Some(DISENGAGE_DURATION),
            EffectKind::Hide => None,
        }
    }

    /// Delta this effect contributes to an entity with the given base speed
    pub fn delta(self, base_speed: u32) -> EffectDelta {
        match self {
            EffectKind::Dodge => EffectDelta {
                defense_advantage: DODGE_DEFENSE_DELTA,
                ..EffectDelta::default()
            },
            EffectKind::Dash => EffectDelta {
                speed: base_speed as i32,
                ..EffectDelta::default()
            },
            EffectKind::Disengage => EffectDelta::default(),
            EffectKind::Hide => EffectDelta {
                defense_advantage: HIDE_DEFENSE_DELTA,
                ..EffectDelta::default()
            },
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Change an effect makes to an entity's live counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EffectDelta {
    pub attack_advantage: i32,
    pub defense_advantage: i32,
    pub speed: i32,
}

impl Add for EffectDelta {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            attack_advantage: self.attack_advantage + rhs.attack_advantage,
            defense_advantage: self.defense_advantage + rhs.defense_advantage,
            speed: self.speed + rhs.speed,
        }
    }
}

impl Neg for EffectDelta {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            attack_advantage: -self.attack_advantage,
            defense_advantage: -self.defense_advantage,
            speed: -self.speed,
        }
    }
}

/// An effect currently in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    /// Owner turns left once armed; `None` never counts down
    pub remaining: Option<u32>,
    /// False until the first end-of-turn tick after activation
    pub armed: bool,
    /// Exactly what was applied; reverted verbatim
    pub applied: EffectDelta,
}

/// What `EffectTracker::activate` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// New slot; the caller must apply this delta
    Applied(EffectDelta),
    /// Already active; countdown reset, nothing to apply
    Refreshed,
}

/// Fixed table of effect slots for one entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTracker {
    slots: [Option<ActiveEffect>; 4],
}

impl EffectTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or refresh an effect
    pub fn activate(&mut self, kind: EffectKind, delta: EffectDelta) -> Activation {
        let slot = &mut self.slots[kind.slot()];
        if let Some(active) = slot {
            active.remaining = kind.duration();
            active.armed = false;
            return Activation::Refreshed;
        }
        *slot = Some(ActiveEffect {
            kind,
            remaining: kind.duration(),
            armed: false,
            applied: delta,
        });
        Activation::Applied(delta)
    }

    /// Advance one owner turn and return the effects that expired
    ///
    /// An effect activated this turn is only armed by its first tick.
    pub fn tick(&mut self) -> Vec<ActiveEffect> {
        let mut expired = Vec::new();
        for slot in self.slots.iter_mut() {
            let Some(active) = slot else {
                continue;
            };
            if !active.armed {
                active.armed = true;
                continue;
            }
            let done = match active.remaining.as_mut() {
                Some(remaining) => {
                    *remaining = remaining.saturating_sub(1);
                    *remaining == 0
                }
                None => false,
            };
            if done {
                expired.extend(slot.take());
            }
        }
        expired
    }

    /// End an effect early, returning it for reversal if it was active
    pub fn end(&mut self, kind: EffectKind) -> Option<ActiveEffect> {
        self.slots[kind.slot()].take()
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.slots[kind.slot()].is_some()
    }

    pub fn get(&self, kind: EffectKind) -> Option<&ActiveEffect> {
        self.slots[kind.slot()].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.slots.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Sum of every delta currently applied
    pub fn applied_total(&self) -> EffectDelta {
        self.iter()
            .fold(EffectDelta::default(), |acc, active| acc + active.applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_activation_applies() {
        let mut tracker = EffectTracker::new();
        let delta = EffectKind::Dodge.delta(30);
        assert_eq!(tracker.activate(EffectKind::Dodge, delta), Activation::Applied(delta));
        assert!(tracker.is_active(EffectKind::Dodge));
        assert_eq!(tracker.applied_total().defense_advantage, -1);
    }

    #[test]
    fn test_reactivation_refreshes_without_stacking() {
        let mut tracker = EffectTracker::new();
        let delta = EffectKind::Dodge.delta(30);
        tracker.activate(EffectKind::Dodge, delta);
        tracker.tick();
        tracker.tick();
        assert_eq!(tracker.get(EffectKind::Dodge).unwrap().remaining, Some(1));

        assert_eq!(tracker.activate(EffectKind::Dodge, delta), Activation::Refreshed);
        let active = tracker.get(EffectKind::Dodge).unwrap();
        assert_eq!(active.remaining, Some(DODGE_DURATION));
        assert!(!active.armed);
        assert_eq!(tracker.applied_total().defense_advantage, -1);
    }

    #[test]
    fn test_dodge_expires_after_two_subsequent_ticks() {
        let mut tracker = EffectTracker::new();
        tracker.activate(EffectKind::Dodge, EffectKind::Dodge.delta(30));
        assert!(tracker.tick().is_empty()); // arming tick (activation turn)
        assert!(tracker.tick().is_empty()); // first subsequent turn
        let expired = tracker.tick(); // second subsequent turn
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].kind, EffectKind::Dodge);
        assert_eq!(expired[0].applied.defense_advantage, -1);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_dash_expires_after_one_subsequent_tick() {
        let mut tracker = EffectTracker::new();
        tracker.activate(EffectKind::Dash, EffectKind::Dash.delta(25));
        assert!(tracker.tick().is_empty());
        let expired = tracker.tick();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].applied.speed, 25);
    }

    #[test]
    fn test_hide_never_counts_down() {
        let mut tracker = EffectTracker::new();
        tracker.activate(EffectKind::Hide, EffectKind::Hide.delta(30));
        for _ in 0..50 {
            assert!(tracker.tick().is_empty());
        }
        let ended = tracker.end(EffectKind::Hide).unwrap();
        assert_eq!(ended.applied.defense_advantage, -1);
        assert!(tracker.end(EffectKind::Hide).is_none());
    }

    #[test]
    fn test_expired_delta_is_the_stored_one() {
        let mut tracker = EffectTracker::new();
        tracker.activate(EffectKind::Dash, EffectKind::Dash.delta(30));
        // A later base speed change must not alter what gets reverted
        let _ = EffectKind::Dash.delta(60);
        tracker.tick();
        let expired = tracker.tick();
        assert_eq!(expired[0].applied.speed, 30);
    }

    #[test]
    fn test_delta_negation_nets_to_zero() {
        for kind in EffectKind::ALL {
            let delta = kind.delta(30);
            assert_eq!(delta + -delta, EffectDelta::default());
        }
    }
}

//! Actions: the weighted action table, selection, and handlers
//!
//! Selection draws from the entity's weight table. A drawn action that
//! needs a target when none exists is redrawn; validation guarantees a
//! target-less action with nonzero weight, so the redraw loop ends.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::constants::{ATTACK_WEIGHT, D20_SIDES, UTILITY_WEIGHT};
use crate::combat::effects::{Activation, EffectKind};
use crate::combat::resolution::{attack_action, AttackReport};
use crate::core::error::{EncounterError, Result};
use crate::core::types::Ability;
use crate::entity::Entity;

/// Closed set of actions an entity can take on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Attack,
    Dodge,
    Dash,
    Disengage,
    Hide,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Attack,
        ActionKind::Dodge,
        ActionKind::Dash,
        ActionKind::Disengage,
        ActionKind::Hide,
    ];

    pub fn requires_target(self) -> bool {
        matches!(self, ActionKind::Attack)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Attack => "Attack",
            ActionKind::Dodge => "Dodge",
            ActionKind::Dash => "Dash",
            ActionKind::Disengage => "Disengage",
            ActionKind::Hide => "Hide",
        }
    }

    /// Default table weight
    pub fn default_weight(self) -> u32 {
        match self {
            ActionKind::Attack => ATTACK_WEIGHT,
            _ => UTILITY_WEIGHT,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-entity action weight table
///
/// Only constructible through validation, so every table can always
/// produce a target-less action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<ActionKind, u32>", into = "BTreeMap<ActionKind, u32>")]
pub struct ActionWeights {
    entries: Vec<(ActionKind, u32)>,
    total_weight: u32,
}

impl ActionWeights {
    /// Build a table from explicit weights; zero-weight entries are dropped
    pub fn new(weights: impl IntoIterator<Item = (ActionKind, u32)>) -> Result<Self> {
        let mut merged: BTreeMap<ActionKind, u32> = BTreeMap::new();
        for (kind, weight) in weights {
            *merged.entry(kind).or_default() += weight;
        }
        let entries: Vec<(ActionKind, u32)> =
            merged.into_iter().filter(|(_, weight)| *weight > 0).collect();
        let table = Self {
            total_weight: entries.iter().map(|(_, weight)| weight).sum(),
            entries,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_weight == 0 {
            return Err(EncounterError::InvalidActionWeights(
                "all action weights are zero".into(),
            ));
        }
        let has_fallback = self
            .entries
            .iter()
            .any(|(kind, weight)| !kind.requires_target() && *weight > 0);
        if !has_fallback {
            return Err(EncounterError::InvalidActionWeights(
                "no action without a target has nonzero weight".into(),
            ));
        }
        Ok(())
    }

    pub fn weight(&self, kind: ActionKind) -> u32 {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, weight)| *weight)
    }

    pub fn total_weight(&self) -> u32 {
        self.total_weight
    }

    /// One weighted draw over the whole table
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> ActionKind {
        let roll = rng.gen_range(0..self.total_weight);
        let mut cumulative = 0;
        for (kind, weight) in &self.entries {
            cumulative += weight;
            if roll < cumulative {
                return *kind;
            }
        }
        // Unreachable while roll < total_weight
        ActionKind::Dodge
    }

    /// Draw until the action is usable with or without a target
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R, has_target: bool) -> ActionKind {
        loop {
            let kind = self.draw(rng);
            if has_target || !kind.requires_target() {
                return kind;
            }
        }
    }
}

impl Default for ActionWeights {
    /// Attack 10, every other action 1
    fn default() -> Self {
        let entries: Vec<(ActionKind, u32)> = ActionKind::ALL
            .into_iter()
            .map(|kind| (kind, kind.default_weight()))
            .collect();
        Self {
            total_weight: entries.iter().map(|(_, weight)| weight).sum(),
            entries,
        }
    }
}

impl TryFrom<BTreeMap<ActionKind, u32>> for ActionWeights {
    type Error = EncounterError;

    fn try_from(map: BTreeMap<ActionKind, u32>) -> Result<Self> {
        Self::new(map)
    }
}

impl From<ActionWeights> for BTreeMap<ActionKind, u32> {
    fn from(table: ActionWeights) -> Self {
        table.entries.into_iter().collect()
    }
}

/// Result of a Hide attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideCheck {
    pub total: i32,
    pub dc: i32,
    pub success: bool,
}

/// What an action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Attack(AttackReport),
    /// Dodge, Dash or Disengage
    Effect(EffectKind, Activation),
    Hide(HideCheck),
    /// Attack chosen with nobody to hit; never produced by `select`
    NoTarget,
}

pub fn dodge(entity: &mut Entity) -> Activation {
    entity.activate_effect(EffectKind::Dodge)
}

pub fn dash(entity: &mut Entity) -> Activation {
    entity.activate_effect(EffectKind::Dash)
}

pub fn disengage(entity: &mut Entity) -> Activation {
    entity.activate_effect(EffectKind::Disengage)
}

/// 1d20 + DEX modifier against `dc`; success hides the entity
pub fn hide<R: Rng + ?Sized>(entity: &mut Entity, rng: &mut R, dc: i32) -> HideCheck {
    let roll = rng.gen_range(1..=D20_SIDES) as i32;
    let total = roll + entity.modifier(Ability::Dexterity);
    let success = total >= dc;
    if success {
        entity.activate_effect(EffectKind::Hide);
    }
    HideCheck { total, dc, success }
}

/// Run the handler for `kind`
pub fn perform<R: Rng + ?Sized>(
    kind: ActionKind,
    actor: &mut Entity,
    target: Option<&mut Entity>,
    rng: &mut R,
    hide_dc: i32,
) -> ActionOutcome {
    let outcome = match kind {
        ActionKind::Attack => match target {
            Some(target) => ActionOutcome::Attack(attack_action(actor, target, rng)),
            None => ActionOutcome::NoTarget,
        },
        ActionKind::Dodge => ActionOutcome::Effect(EffectKind::Dodge, dodge(actor)),
        ActionKind::Dash => ActionOutcome::Effect(EffectKind::Dash, dash(actor)),
        ActionKind::Disengage => ActionOutcome::Effect(EffectKind::Disengage, disengage(actor)),
        ActionKind::Hide => ActionOutcome::Hide(hide(actor, rng, hide_dc)),
    };
    debug!(entity = %actor.name, action = %kind, ?outcome, "action resolved");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::weapons::Weapon;
    use crate::entity::{AbilityScores, EntityBuilder};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn rogue() -> Entity {
        EntityBuilder::party("Rogue", "Rogue", "Thief", 3)
            .abilities(AbilityScores::new(10, 18, 12, 10, 10, 10))
            .hitpoints(20)
            .weapon(Arc::new(Weapon::dagger()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_weights() {
        let table = ActionWeights::default();
        assert_eq!(table.weight(ActionKind::Attack), 10);
        assert_eq!(table.weight(ActionKind::Dodge), 1);
        assert_eq!(table.weight(ActionKind::Hide), 1);
        assert_eq!(table.total_weight(), 14);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_attack_only_table_rejected() {
        let result = ActionWeights::new([(ActionKind::Attack, 5)]);
        assert!(matches!(result, Err(EncounterError::InvalidActionWeights(_))));
        let result = ActionWeights::new([(ActionKind::Attack, 5), (ActionKind::Dodge, 0)]);
        assert!(result.is_err());
        assert!(ActionWeights::new([]).is_err());
    }

    #[test]
    fn test_select_without_target_never_attacks() {
        let table =
            ActionWeights::new([(ActionKind::Attack, 1000), (ActionKind::Dash, 1)]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..20 {
            assert_eq!(table.select(&mut rng, false), ActionKind::Dash);
        }
    }

    #[test]
    fn test_draw_follows_weights() {
        let table = ActionWeights::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let attacks = (0..1400)
            .filter(|_| table.draw(&mut rng) == ActionKind::Attack)
            .count();
        // Expected 1000 of 1400
        assert!((850..1150).contains(&attacks), "attacks = {attacks}");
    }

    #[test]
    fn test_weights_deserialize_from_toml() {
        let table: ActionWeights = toml::from_str("Attack = 3\nHide = 2\n").unwrap();
        assert_eq!(table.weight(ActionKind::Hide), 2);
        assert_eq!(table.total_weight(), 5);
        assert!(toml::from_str::<ActionWeights>("Attack = 3\n").is_err());
    }

    #[test]
    fn test_hide_success_and_failure() {
        let mut rogue = rogue();
        // Minimum roll 1 + DEX 4 = 5
        let check = hide(&mut rogue, &mut StepRng::new(0, 0), 5);
        assert!(check.success);
        assert!(rogue.is_hidden());

        let mut rogue = self::rogue();
        let check = hide(&mut rogue, &mut StepRng::new(0, 0), 15);
        assert!(!check.success);
        assert!(!rogue.is_hidden());
        assert_eq!(rogue.defense_advantage, 0);
    }

    #[test]
    fn test_perform_dispatches_effects() {
        let mut rogue = rogue();
        let mut rng = StepRng::new(0, 0);
        let outcome = perform(ActionKind::Dodge, &mut rogue, None, &mut rng, 15);
        assert!(matches!(
            outcome,
            ActionOutcome::Effect(EffectKind::Dodge, Activation::Applied(_))
        ));
        let outcome = perform(ActionKind::Disengage, &mut rogue, None, &mut rng, 15);
        assert!(matches!(outcome, ActionOutcome::Effect(EffectKind::Disengage, _)));
        assert!(rogue.is_disengaged());
        assert_eq!(
            perform(ActionKind::Attack, &mut rogue, None, &mut rng, 15),
            ActionOutcome::NoTarget
        );
    }
}

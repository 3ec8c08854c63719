//! Combatants: static stats plus the mutable state a combat run changes
//!
//! Party members and enemies share one `Entity` type. What differs between
//! them lives in `FactionTraits` and is reached through `Capabilities`.

pub mod abilities;
pub mod builder;
pub mod faction;
pub mod hitpoints;

pub use abilities::AbilityScores;
pub use builder::EntityBuilder;
pub use faction::{Capabilities, EnemyInfo, FactionTraits, PartyInfo};
pub use hitpoints::HitPoints;

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::trace;

use crate::combat::actions::ActionWeights;
use crate::combat::effects::{ActiveEffect, Activation, EffectDelta, EffectKind, EffectTracker};
use crate::combat::reactions::ReactionKind;
use crate::combat::weapons::Weapon;
use crate::core::error::Result;
use crate::core::types::{Ability, CombatStyle, Condition, DamageType, Faction, Size};
use crate::spatial::Position;

/// One creature taking part in a combat
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub faction: Faction,
    pub traits: FactionTraits,
    pub abilities: AbilityScores,
    pub ac: i32,
    pub initiative_bonus: i32,
    pub proficiency_bonus: i32,

    // Movement
    pub base_speed: u32,
    /// Ground speed including any active Dash bonus
    pub speed: u32,
    pub flying_speed: u32,
    pub is_flying: bool,

    pub hitpoints: HitPoints,
    pub size: Size,
    pub weapon: Arc<Weapon>,
    pub combat_style: CombatStyle,
    pub position: Position,

    /// Live advantage counters; only the sign of the combined score matters
    pub attack_advantage: i32,
    pub defense_advantage: i32,

    pub conditions: BTreeSet<Condition>,
    pub resistances: BTreeSet<DamageType>,
    pub immunities: BTreeSet<DamageType>,
    pub effects: EffectTracker,

    /// Reset at the end of the entity's own turn
    pub reaction_available: bool,
    pub reactions: Vec<ReactionKind>,
    pub actions: ActionWeights,

    /// Cleared at the end of the entity's first turn
    pub is_surprised: bool,
    /// Distance fallen so far while `Falling`
    pub fall_distance: f64,
    /// d20 + initiative bonus, once rolled
    pub initiative_total: Option<i32>,
}

impl Entity {
    pub fn is_alive(&self) -> bool {
        self.hitpoints.is_alive()
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }

    /// Modifier by ability abbreviation; unknown names are a configuration error
    pub fn modifier_by_name(&self, name: &str) -> Result<i32> {
        self.abilities.modifier_by_name(name)
    }

    /// Attacks made by one Attack action
    pub fn attack_count(&self) -> u32 {
        self.traits.attack_count()
    }

    pub fn describe(&self) -> String {
        format!("{} [{}]", self.name, self.traits.describe())
    }

    /// Feet this entity may move this turn
    ///
    /// Airborne fliers use their flying speed. A Dash bonus applies to
    /// either mode.
    pub fn movement_budget(&self) -> f64 {
        if self.is_flying {
            let dash_bonus = self.speed.saturating_sub(self.base_speed);
            f64::from(self.flying_speed + dash_bonus)
        } else {
            f64::from(self.speed)
        }
    }

    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }

    pub fn is_hidden(&self) -> bool {
        self.effects.is_active(EffectKind::Hide)
    }

    pub fn is_falling(&self) -> bool {
        self.has_condition(Condition::Falling)
    }

    /// Opportunity attacks may not target a disengaged entity
    pub fn is_disengaged(&self) -> bool {
        self.effects.is_active(EffectKind::Disengage)
    }

    pub fn has_reaction(&self, reaction: ReactionKind) -> bool {
        self.reactions.contains(&reaction)
    }

    pub fn can_take_reaction(&self) -> bool {
        self.is_alive() && self.reaction_available && !self.is_surprised
    }

    pub fn use_reaction(&mut self) {
        self.reaction_available = false;
    }

    pub fn reset_reaction(&mut self) {
        self.reaction_available = true;
    }

    /// Start or refresh an effect, applying its delta only when new
    pub fn activate_effect(&mut self, kind: EffectKind) -> Activation {
        let delta = kind.delta(self.base_speed);
        let activation = self.effects.activate(kind, delta);
        if let Activation::Applied(delta) = activation {
            self.apply_effect(kind, delta);
        }
        activation
    }

    /// Advance this entity's effects by one of its turns
    ///
    /// Returns the kinds that expired; each has already been reverted.
    pub fn tick_effects(&mut self) -> Vec<EffectKind> {
        self.effects
            .tick()
            .into_iter()
            .map(|expired| {
                self.revert_effect(expired);
                expired.kind
            })
            .collect()
    }

    /// End an effect early; false if it was not active
    pub fn end_effect(&mut self, kind: EffectKind) -> bool {
        match self.effects.end(kind) {
            Some(active) => {
                self.revert_effect(active);
                true
            }
            None => false,
        }
    }

    fn apply_effect(&mut self, kind: EffectKind, delta: EffectDelta) {
        self.adjust(delta);
        if kind == EffectKind::Hide {
            self.conditions.insert(Condition::Hidden);
        }
        trace!(entity = %self.name, ?kind, ?delta, "effect applied");
    }

    fn revert_effect(&mut self, active: ActiveEffect) {
        self.adjust(-active.applied);
        if active.kind == EffectKind::Hide {
            self.conditions.remove(&Condition::Hidden);
        }
        trace!(
            entity = %self.name,
            kind = ?active.kind,
            delta = ?active.applied,
            "effect reverted"
        );
    }

    fn adjust(&mut self, delta: EffectDelta) {
        self.attack_advantage += delta.attack_advantage;
        self.defense_advantage += delta.defense_advantage;
        self.speed = self.speed.saturating_add_signed(delta.speed);
    }

    /// Take to the air at combat start
    ///
    /// Anything with a flying speed flies. Anyone else placed above the
    /// ground starts falling.
    pub fn start_flying(&mut self) {
        self.is_flying = self.flying_speed > 0;
        if !self.is_flying && self.position.is_airborne() {
            self.start_falling();
        }
    }

    pub fn start_falling(&mut self) {
        self.is_flying = false;
        self.fall_distance = 0.0;
        self.conditions.insert(Condition::Falling);
    }

    /// Touch down: clear the fall and put the entity on the ground
    pub fn land(&mut self) {
        self.conditions.remove(&Condition::Falling);
        self.fall_distance = 0.0;
        self.position.set_z(0.0);
    }

    pub fn is_resistant(&self, damage_type: DamageType) -> bool {
        self.resistances.contains(&damage_type)
    }

    pub fn is_immune(&self, damage_type: DamageType) -> bool {
        self.immunities.contains(&damage_type)
    }
}

/// Borrow two distinct roster entries mutably at once
pub fn pair_mut(entities: &mut [Entity], a: usize, b: usize) -> Option<(&mut Entity, &mut Entity)> {
    if a == b || a >= entities.len() || b >= entities.len() {
        return None;
    }
    if a < b {
        let (left, right) = entities.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = entities.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}

//! Validated construction of entities

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::combat::actions::ActionWeights;
use crate::combat::effects::EffectTracker;
use crate::combat::reactions::ReactionKind;
use crate::combat::weapons::Weapon;
use crate::core::error::{EncounterError, Result};
use crate::core::types::{CombatStyle, DamageType, Faction, Size};
use crate::entity::{AbilityScores, EnemyInfo, Entity, FactionTraits, HitPoints, PartyInfo};
use crate::spatial::Position;

const DEFAULT_GRID_SIZE: f64 = 5000.0;

/// Builder for `Entity`; everything is checked in `build`
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    name: String,
    traits: FactionTraits,
    abilities: AbilityScores,
    ac: i32,
    initiative_bonus: i32,
    proficiency_bonus: i32,
    speed: u32,
    flying_speed: u32,
    max_hitpoints: u32,
    current_hitpoints: Option<u32>,
    size: Size,
    weapon: Option<Arc<Weapon>>,
    combat_style: CombatStyle,
    coords: (f64, f64, f64),
    grid_size: f64,
    resistances: BTreeSet<DamageType>,
    immunities: BTreeSet<DamageType>,
    reactions: Option<Vec<ReactionKind>>,
    actions: ActionWeights,
    surprised: bool,
}

impl EntityBuilder {
    fn with_traits(name: impl Into<String>, traits: FactionTraits) -> Self {
        Self {
            name: name.into(),
            traits,
            abilities: AbilityScores::default(),
            ac: 10,
            initiative_bonus: 0,
            proficiency_bonus: 2,
            speed: 30,
            flying_speed: 0,
            max_hitpoints: 1,
            current_hitpoints: None,
            size: Size::default(),
            weapon: None,
            combat_style: CombatStyle::default(),
            coords: (0.0, 0.0, 0.0),
            grid_size: DEFAULT_GRID_SIZE,
            resistances: BTreeSet::new(),
            immunities: BTreeSet::new(),
            reactions: None,
            actions: ActionWeights::default(),
            surprised: false,
        }
    }

    pub fn party(
        name: impl Into<String>,
        class: impl Into<String>,
        subclass: impl Into<String>,
        level: u32,
    ) -> Self {
        Self::with_traits(
            name,
            FactionTraits::Party(PartyInfo {
                class: class.into(),
                subclass: subclass.into(),
                level,
            }),
        )
    }

    pub fn enemy(name: impl Into<String>, multiattack: bool, attack_count: u32) -> Self {
        Self::with_traits(
            name,
            FactionTraits::Enemy(EnemyInfo::new(multiattack, attack_count)),
        )
    }

    pub fn abilities(mut self, abilities: AbilityScores) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn ac(mut self, ac: i32) -> Self {
        self.ac = ac;
        self
    }

    pub fn initiative_bonus(mut self, bonus: i32) -> Self {
        self.initiative_bonus = bonus;
        self
    }

    pub fn proficiency_bonus(mut self, bonus: i32) -> Self {
        self.proficiency_bonus = bonus;
        self
    }

    pub fn speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn flying_speed(mut self, speed: u32) -> Self {
        self.flying_speed = speed;
        self
    }

    pub fn hitpoints(mut self, max: u32) -> Self {
        self.max_hitpoints = max;
        self
    }

    /// Start below maximum
    pub fn current_hitpoints(mut self, current: u32) -> Self {
        self.current_hitpoints = Some(current);
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn weapon(mut self, weapon: Arc<Weapon>) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn combat_style(mut self, style: CombatStyle) -> Self {
        self.combat_style = style;
        self
    }

    pub fn position(mut self, x: f64, y: f64, z: f64) -> Self {
        self.coords = (x, y, z);
        self
    }

    pub fn grid_size(mut self, grid_size: f64) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn resistances(mut self, types: impl IntoIterator<Item = DamageType>) -> Self {
        self.resistances.extend(types);
        self
    }

    pub fn immunities(mut self, types: impl IntoIterator<Item = DamageType>) -> Self {
        self.immunities.extend(types);
        self
    }

    /// Override the reactions implied by the combat style
    pub fn reactions(mut self, reactions: Vec<ReactionKind>) -> Self {
        self.reactions = Some(reactions);
        self
    }

    pub fn actions(mut self, actions: ActionWeights) -> Self {
        self.actions = actions;
        self
    }

    pub fn surprised(mut self, surprised: bool) -> Self {
        self.surprised = surprised;
        self
    }

    pub fn build(self) -> Result<Entity> {
        if self.name.trim().is_empty() {
            return Err(EncounterError::InvalidEntity("entity name is empty".into()));
        }
        if self.max_hitpoints == 0 {
            return Err(EncounterError::InvalidEntity(format!(
                "{} has no hitpoints",
                self.name
            )));
        }
        let (x, y, z) = self.coords;
        if ![x, y, z].iter().all(|coord| coord.is_finite()) {
            return Err(EncounterError::InvalidEntity(format!(
                "{} has a non-finite position ({x}, {y}, {z})",
                self.name
            )));
        }
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return Err(EncounterError::InvalidEntity(format!(
                "{} has an invalid grid size {}",
                self.name, self.grid_size
            )));
        }
        let weapon = self.weapon.ok_or_else(|| {
            EncounterError::InvalidEntity(format!("{} has no weapon", self.name))
        })?;
        let hitpoints = match self.current_hitpoints {
            Some(current) => HitPoints::with_current(self.max_hitpoints, current)?,
            None => HitPoints::new(self.max_hitpoints),
        };
        self.actions.validate()?;

        let faction = match self.traits {
            FactionTraits::Party(_) => Faction::Party,
            FactionTraits::Enemy(_) => Faction::Enemy,
        };
        let reactions = self
            .reactions
            .unwrap_or_else(|| ReactionKind::defaults_for(self.combat_style));

        Ok(Entity {
            name: self.name,
            faction,
            traits: self.traits,
            abilities: self.abilities,
            ac: self.ac,
            initiative_bonus: self.initiative_bonus,
            proficiency_bonus: self.proficiency_bonus,
            base_speed: self.speed,
            speed: self.speed,
            flying_speed: self.flying_speed,
            is_flying: false,
            hitpoints,
            size: self.size,
            weapon,
            combat_style: self.combat_style,
            position: Position::new(x, y, z, self.grid_size),
            attack_advantage: 0,
            defense_advantage: 0,
            conditions: BTreeSet::new(),
            resistances: self.resistances,
            immunities: self.immunities,
            effects: EffectTracker::new(),
            reaction_available: true,
            reactions,
            actions: self.actions,
            is_surprised: self.surprised,
            fall_distance: 0.0,
            initiative_total: None,
        })
    }
}

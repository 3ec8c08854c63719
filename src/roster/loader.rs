//! Load a roster (weapons + entities) from TOML
//!
//! Everything that can be wrong with a roster is caught here: dice
//! notation, ability and damage-type names, weapon references, action
//! weights, hitpoints and duplicate names. A roster that loads can fight.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::combat::actions::ActionWeights;
use crate::combat::reactions::ReactionKind;
use crate::combat::weapons::{Weapon, WeaponTable};
use crate::core::config::SimulationConfig;
use crate::core::error::{EncounterError, Result};
use crate::core::types::{CombatStyle, DamageType, Faction, Size};
use crate::encounter::validate_roster;
use crate::entity::{AbilityScores, Entity, EntityBuilder};

/// Top-level roster document
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterFile {
    /// Extra weapons, added to (or replacing) the standard ones
    #[serde(default)]
    pub weapons: BTreeMap<String, Weapon>,
    pub entities: Vec<EntityDefinition>,
}

fn default_level() -> u32 {
    1
}

fn default_attack_count() -> u32 {
    1
}

fn default_ac() -> i32 {
    10
}

fn default_speed() -> u32 {
    30
}

fn default_proficiency() -> i32 {
    2
}

/// One `[[entities]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDefinition {
    pub name: String,
    pub faction: Faction,

    // Party extras
    pub class: Option<String>,
    #[serde(default)]
    pub subclass: String,
    #[serde(default = "default_level")]
    pub level: u32,

    // Enemy extras
    #[serde(default)]
    pub multiattack: bool,
    #[serde(default = "default_attack_count")]
    pub attack_count: u32,

    pub abilities: AbilityScores,
    #[serde(default = "default_ac")]
    pub ac: i32,
    #[serde(default)]
    pub initiative_bonus: i32,
    #[serde(default = "default_proficiency")]
    pub proficiency_bonus: i32,
    #[serde(default = "default_speed")]
    pub speed: u32,
    #[serde(default)]
    pub flying_speed: u32,
    pub hitpoints: u32,
    #[serde(default)]
    pub size: Size,
    pub weapon: String,
    #[serde(default)]
    pub combat_style: CombatStyle,
    #[serde(default)]
    pub position: [f64; 3],
    #[serde(default)]
    pub resistances: Vec<DamageType>,
    #[serde(default)]
    pub immunities: Vec<DamageType>,
    pub actions: Option<ActionWeights>,
    pub reactions: Option<Vec<ReactionKind>>,
    #[serde(default)]
    pub surprised: bool,
}

impl EntityDefinition {
    /// Resolve the weapon reference and build a validated entity
    pub fn build(self, weapons: &WeaponTable, config: &SimulationConfig) -> Result<Entity> {
        let weapon = weapons.get(&self.weapon)?;
        let builder = match self.faction {
            Faction::Party => {
                let class = self.class.ok_or_else(|| {
                    let message = format!("party member {} has no class", self.name);
                    EncounterError::InvalidEntity(message)
                })?;
                EntityBuilder::party(self.name, class, self.subclass, self.level)
            }
            Faction::Enemy => {
                if self.class.is_some() {
                    warn!(entity = %self.name, "class ignored for enemy");
                }
                EntityBuilder::enemy(self.name, self.multiattack, self.attack_count)
            }
        };

        let [x, y, z] = self.position;
        let mut builder = builder
            .abilities(self.abilities)
            .ac(self.ac)
            .initiative_bonus(self.initiative_bonus)
            .proficiency_bonus(self.proficiency_bonus)
            .speed(self.speed)
            .flying_speed(self.flying_speed)
            .hitpoints(self.hitpoints)
            .size(self.size)
            .weapon(weapon)
            .combat_style(self.combat_style)
            .grid_size(config.grid_size)
            .position(x, y, z)
            .resistances(self.resistances)
            .immunities(self.immunities)
            .surprised(self.surprised);
        if let Some(actions) = self.actions {
            builder = builder.actions(actions);
        }
        if let Some(reactions) = self.reactions {
            builder = builder.reactions(reactions);
        }
        builder.build()
    }
}

/// Parse and validate a roster document
pub fn load_roster_str(content: &str, config: &SimulationConfig) -> Result<Vec<Entity>> {
    let file: RosterFile = toml::from_str(content)?;

    let mut weapons = WeaponTable::standard();
    weapons.add_definitions(file.weapons)?;

    let entities = file
        .entities
        .into_iter()
        .map(|definition| definition.build(&weapons, config))
        .collect::<Result<Vec<_>>>()?;
    validate_roster(&entities)?;

    info!(entities = entities.len(), weapons = weapons.len(), "roster loaded");
    Ok(entities)
}

/// Read and validate a roster file
pub fn load_roster(path: &Path, config: &SimulationConfig) -> Result<Vec<Entity>> {
    let content = fs::read_to_string(path)?;
    load_roster_str(&content, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::actions::ActionKind;
    use crate::core::types::Ability;

    const ROSTER: &str = r#"
        [weapons.greataxe]
        damage_dice = "1d12"
        ability = "STR"
        damage_type = "slashing"
        range = 5.0

        [[entities]]
        name = "Grog"
        faction = "party"
        class = "Barbarian"
        subclass = "Berserker"
        level = 5
        abilities = { STR = 18, DEX = 12, CON = 16, INT = 8, WIS = 10, CHA = 9 }
        ac = 14
        hitpoints = 55
        weapon = "greataxe"
        position = [100.0, 100.0, 0.0]
        actions = { Attack = 8, Dash = 2 }

        [[entities]]
        name = "Harpy"
        faction = "enemy"
        multiattack = true
        attack_count = 2
        abilities = { STR = 12, DEX = 13, CON = 12, INT = 7, WIS = 10, CHA = 13 }
        ac = 11
        hitpoints = 38
        weapon = "claws"
        flying_speed = 40
        position = [150.0, 120.0, 20.0]
        resistances = ["piercing"]
        surprised = true
    "#;

    #[test]
    fn test_load_roster() {
        let entities = load_roster_str(ROSTER, &SimulationConfig::default()).unwrap();
        assert_eq!(entities.len(), 2);

        let grog = &entities[0];
        assert_eq!(grog.faction, Faction::Party);
        assert_eq!(grog.weapon.name, "greataxe");
        assert_eq!(grog.modifier(Ability::Strength), 4);
        assert_eq!(grog.actions.weight(ActionKind::Attack), 8);
        assert_eq!(grog.actions.weight(ActionKind::Dodge), 0);
        assert!(grog.has_reaction(ReactionKind::OpportunityAttack));

        let harpy = &entities[1];
        assert_eq!(harpy.attack_count(), 2);
        assert_eq!(harpy.position.z(), 20.0);
        assert!(harpy.is_surprised);
        assert!(harpy.is_resistant(DamageType::Piercing));
    }

    #[test]
    fn test_unknown_weapon_rejected() {
        let doc = ROSTER.replace("weapon = \"greataxe\"", "weapon = \"maul\"");
        let result = load_roster_str(&doc, &SimulationConfig::default());
        assert!(matches!(result, Err(EncounterError::UnknownWeapon(name)) if name == "maul"));
    }

    #[test]
    fn test_bad_dice_rejected_before_combat() {
        let doc = ROSTER.replace("\"1d12\"", "\"1d\"");
        assert!(matches!(
            load_roster_str(&doc, &SimulationConfig::default()),
            Err(EncounterError::TomlError(_))
        ));
    }

    #[test]
    fn test_attack_only_actions_rejected() {
        let doc = ROSTER.replace("actions = { Attack = 8, Dash = 2 }", "actions = { Attack = 8 }");
        assert!(load_roster_str(&doc, &SimulationConfig::default()).is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let doc = ROSTER.replace("name = \"Harpy\"", "name = \"Grog\"");
        assert!(matches!(
            load_roster_str(&doc, &SimulationConfig::default()),
            Err(EncounterError::InvalidEntity(_))
        ));
    }

    #[test]
    fn test_party_member_needs_class() {
        let doc = ROSTER.replace("class = \"Barbarian\"", "");
        assert!(load_roster_str(&doc, &SimulationConfig::default()).is_err());
    }

    #[test]
    fn test_non_finite_position_rejected() {
        for bad in ["[nan, 100.0, 0.0]", "[100.0, inf, 0.0]"] {
            let doc = ROSTER.replace("[100.0, 100.0, 0.0]", bad);
            assert!(matches!(
                load_roster_str(&doc, &SimulationConfig::default()),
                Err(EncounterError::InvalidEntity(_))
            ));
        }
    }

    #[test]
    fn test_oversized_dice_rejected() {
        for bad in ["\"1000000d100000\"", "\"101d6\""] {
            let doc = ROSTER.replace("\"1d12\"", bad);
            assert!(matches!(
                load_roster_str(&doc, &SimulationConfig::default()),
                Err(EncounterError::TomlError(_))
            ));
        }
    }

    #[test]
    fn test_infinite_weapon_range_rejected() {
        let doc = ROSTER.replace("range = 5.0", "range = inf");
        assert!(load_roster_str(&doc, &SimulationConfig::default()).is_err());
    }
}

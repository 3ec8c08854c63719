//! Weapon definitions and the shared lookup table
//!
//! Weapons are immutable once loaded. Entities hold an `Arc<Weapon>`, so
//! cloning a roster for another run never copies weapon data.

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::combat::dice::DiceSpec;
use crate::core::error::{EncounterError, Result};
use crate::core::types::{Ability, DamageType};

/// Complete weapon properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Table key (filled in from the map key when loaded)
    #[serde(default)]
    pub name: String,
    pub damage_dice: DiceSpec,
    /// Ability whose modifier is added to attack and damage rolls
    #[serde(alias = "modifier")]
    pub ability: Ability,
    pub damage_type: DamageType,
    /// Reach (melee) or effective range (ranged), in feet
    pub range: f64,
}

impl Weapon {
    pub fn new(
        name: impl Into<String>,
        damage_dice: DiceSpec,
        ability: Ability,
        damage_type: DamageType,
        range: f64,
    ) -> Self {
        Self {
            name: name.into(),
            damage_dice,
            ability,
            damage_type,
            range,
        }
    }

    /// Common weapon: Longsword
    pub fn longsword() -> Self {
        Self::new(
            "longsword",
            DiceSpec { count: 1, sides: 8 },
            Ability::Strength,
            DamageType::Slashing,
            5.0,
        )
    }

    /// Common weapon: Battleaxe
    pub fn battleaxe() -> Self {
        Self::new(
            "battleaxe",
            DiceSpec { count: 1, sides: 10 },
            Ability::Strength,
            DamageType::Slashing,
            5.0,
        )
    }

    /// Common weapon: Dagger (thrown)
    pub fn dagger() -> Self {
        Self::new(
            "dagger",
            DiceSpec { count: 1, sides: 4 },
            Ability::Dexterity,
            DamageType::Piercing,
            20.0,
        )
    }

    /// Common weapon: Bow
    pub fn bow() -> Self {
        Self::new(
            "bow",
            DiceSpec { count: 1, sides: 8 },
            Ability::Dexterity,
            DamageType::Piercing,
            80.0,
        )
    }

    /// Natural weapon: Claws
    pub fn claws() -> Self {
        Self::new(
            "claws",
            DiceSpec { count: 1, sides: 6 },
            Ability::Strength,
            DamageType::Slashing,
            5.0,
        )
    }
}

/// Name → weapon lookup, built once before combat
#[derive(Debug, Clone, Default)]
pub struct WeaponTable {
    weapons: AHashMap<String, Arc<Weapon>>,
}

impl WeaponTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The five stock weapons
    pub fn standard() -> Self {
        let mut table = Self::new();
        for weapon in [
            Weapon::longsword(),
            Weapon::battleaxe(),
            Weapon::dagger(),
            Weapon::bow(),
            Weapon::claws(),
        ] {
            table.insert(weapon);
        }
        table
    }

    /// Build a table from deserialized definitions keyed by name
    pub fn from_definitions(definitions: BTreeMap<String, Weapon>) -> Result<Self> {
        let mut table = Self::new();
        table.add_definitions(definitions)?;
        Ok(table)
    }

    /// Add definitions keyed by name, replacing same-named entries
    pub fn add_definitions(&mut self, definitions: BTreeMap<String, Weapon>) -> Result<()> {
        for (name, mut weapon) in definitions {
            if !(weapon.range.is_finite() && weapon.range >= 0.0) {
                return Err(EncounterError::InvalidEntity(format!(
                    "weapon {} has invalid range {}",
                    name, weapon.range
                )));
            }
            weapon.name = name;
            self.insert(weapon);
        }
        Ok(())
    }

    pub fn insert(&mut self, weapon: Weapon) -> Arc<Weapon> {
        let weapon = Arc::new(weapon);
        self.weapons.insert(weapon.name.clone(), Arc::clone(&weapon));
        weapon
    }

    pub fn get(&self, name: &str) -> Result<Arc<Weapon>> {
        self.weapons
            .get(name)
            .cloned()
            .ok_or_else(|| EncounterError::UnknownWeapon(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

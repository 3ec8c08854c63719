//! Core type definitions used throughout the codebase

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::EncounterError;

/// Side an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Party,
    Enemy,
}

impl Faction {
    /// The side this faction fights against
    pub fn opponent(self) -> Self {
        match self {
            Faction::Party => Faction::Enemy,
            Faction::Enemy => Faction::Party,
        }
    }
}

/// Outcome of a combat run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Party,
    Enemies,
    /// No side won: empty roster or the round ceiling was hit
    #[default]
    None,
}

impl Winner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::Party => "party",
            Winner::Enemies => "enemies",
            Winner::None => "none",
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six ability scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ability {
    #[serde(rename = "STR")]
    Strength,
    #[serde(rename = "DEX")]
    Dexterity,
    #[serde(rename = "CON")]
    Constitution,
    #[serde(rename = "INT")]
    Intelligence,
    #[serde(rename = "WIS")]
    Wisdom,
    #[serde(rename = "CHA")]
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    /// Position in `Ability::ALL`, used to index score arrays
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for Ability {
    type Err = EncounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ability::ALL
            .into_iter()
            .find(|a| a.abbreviation().eq_ignore_ascii_case(s))
            .ok_or_else(|| EncounterError::UnknownAbility(s.to_string()))
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Damage type tag used by resistances and immunities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    Slashing,
    Piercing,
    Bludgeoning,
    Fire,
    Cold,
    Lightning,
    Thunder,
    Acid,
    Poison,
    Necrotic,
    Radiant,
    Force,
    Psychic,
}

impl DamageType {
    pub const ALL: [DamageType; 13] = [
        DamageType::Slashing,
        DamageType::Piercing,
        DamageType::Bludgeoning,
        DamageType::Fire,
        DamageType::Cold,
        DamageType::Lightning,
        DamageType::Thunder,
        DamageType::Acid,
        DamageType::Poison,
        DamageType::Necrotic,
        DamageType::Radiant,
        DamageType::Force,
        DamageType::Psychic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DamageType::Slashing => "slashing",
            DamageType::Piercing => "piercing",
            DamageType::Bludgeoning => "bludgeoning",
            DamageType::Fire => "fire",
            DamageType::Cold => "cold",
            DamageType::Lightning => "lightning",
            DamageType::Thunder => "thunder",
            DamageType::Acid => "acid",
            DamageType::Poison => "poison",
            DamageType::Necrotic => "necrotic",
            DamageType::Radiant => "radiant",
            DamageType::Force => "force",
            DamageType::Psychic => "psychic",
        }
    }
}

impl FromStr for DamageType {
    type Err = EncounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DamageType::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| EncounterError::UnknownDamageType(s.to_string()))
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creature size category (descriptive only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
    Gargantuan,
}

/// How an entity positions itself relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatStyle {
    /// Close to weapon range, then attack
    #[default]
    Melee,
    /// Keep a standoff distance from the nearest opponent
    Ranged,
}

/// Conditions modelled by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Airborne without flying speed
    Falling,
    /// Successfully hidden; attacks against this entity have disadvantage
    Hidden,
}

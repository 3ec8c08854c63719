//! Ability scores and modifiers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{EncounterError, Result};
use crate::core::types::Ability;

/// The six ability scores of one creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Ability, i32>", into = "BTreeMap<Ability, i32>")]
pub struct AbilityScores {
    scores: [i32; 6],
}

impl AbilityScores {
    /// Scores in STR, DEX, CON, INT, WIS, CHA order
    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        Self {
            scores: [str, dex, con, int, wis, cha],
        }
    }

    pub fn score(&self, ability: Ability) -> i32 {
        self.scores[ability.index()]
    }

    pub fn set(&mut self, ability: Ability, score: i32) {
        self.scores[ability.index()] = score;
    }

    /// `floor((score - 10) / 2)`, rounding toward negative infinity
    pub fn modifier(&self, ability: Ability) -> i32 {
        (self.score(ability) - 10).div_euclid(2)
    }

    /// Modifier looked up by abbreviation ("STR", "dex", ...)
    pub fn modifier_by_name(&self, name: &str) -> Result<i32> {
        Ok(self.modifier(name.parse()?))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self { scores: [10; 6] }
    }
}

impl TryFrom<BTreeMap<Ability, i32>> for AbilityScores {
    type Error = EncounterError;

    fn try_from(map: BTreeMap<Ability, i32>) -> Result<Self> {
        let mut scores = AbilityScores::default();
        for ability in Ability::ALL {
            let score = map.get(&ability).copied().ok_or_else(|| {
                EncounterError::InvalidEntity(format!("missing ability score {}", ability))
            })?;
            scores.set(ability, score);
        }
        Ok(scores)
    }
}

impl From<AbilityScores> for BTreeMap<Ability, i32> {
    fn from(scores: AbilityScores) -> Self {
        Ability::ALL
            .into_iter()
            .map(|ability| (ability, scores.score(ability)))
            .collect()
    }
}

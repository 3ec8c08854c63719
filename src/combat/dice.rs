//! Dice notation and rolling
//!
//! `NdM` is the sum of N independent uniform rolls in `1..=M`. Notation is
//! parsed once, when weapons are loaded, so malformed notation can never
//! reach combat.

use std::fmt;
use std::str::FromStr;

use nom::character::complete::{char, u32 as decimal};
use nom::combinator::all_consuming;
use nom::sequence::separated_pair;
use nom::{IResult, Parser};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::constants::{D20_SIDES, MAX_DICE_COUNT, MAX_DICE_SIDES};
use crate::core::error::{EncounterError, Result};

/// A parsed `NdM` damage dice specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceSpec {
    pub count: u32,
    pub sides: u32,
}

impl DiceSpec {
    /// Both parts must be in `1..=MAX_DICE_COUNT` and `1..=MAX_DICE_SIDES`
    pub fn new(count: u32, sides: u32) -> Result<Self> {
        if !(1..=MAX_DICE_COUNT).contains(&count) || !(1..=MAX_DICE_SIDES).contains(&sides) {
            return Err(EncounterError::InvalidDice(format!("{}d{}", count, sides)));
        }
        Ok(Self { count, sides })
    }

    /// Sum of `count` rolls of a `sides`-sided die
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        (0..self.count).fold(0u32, |total, _| {
            total.saturating_add(rng.gen_range(1..=self.sides.max(1)))
        })
    }

    pub fn min_total(&self) -> u32 {
        self.count
    }

    pub fn max_total(&self) -> u32 {
        self.count.saturating_mul(self.sides)
    }
}

fn notation(input: &str) -> IResult<&str, (u32, u32)> {
    all_consuming(separated_pair(decimal, char('d'), decimal)).parse(input)
}

impl FromStr for DiceSpec {
    type Err = EncounterError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (_, (count, sides)) =
            notation(trimmed).map_err(|_| EncounterError::InvalidDice(s.to_string()))?;
        DiceSpec::new(count, sides).map_err(|_| EncounterError::InvalidDice(s.to_string()))
    }
}

impl TryFrom<String> for DiceSpec {
    type Error = EncounterError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DiceSpec> for String {
    fn from(spec: DiceSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// Parse and roll damage notation in one step
pub fn roll_damage<R: Rng + ?Sized>(notation: &str, rng: &mut R) -> Result<u32> {
    Ok(notation.parse::<DiceSpec>()?.roll(rng))
}

/// How many d20s to roll and which to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollMode {
    Normal,
    /// Roll two, keep the higher
    Advantage,
    /// Roll two, keep the lower
    Disadvantage,
}

impl RollMode {
    /// Only the sign of the net advantage score matters
    pub fn from_net(net: i32) -> Self {
        match net.signum() {
            1 => RollMode::Advantage,
            -1 => RollMode::Disadvantage,
            _ => RollMode::Normal,
        }
    }
}

/// Roll a d20 under the given mode and return the kept face
pub fn roll_d20<R: Rng + ?Sized>(mode: RollMode, rng: &mut R) -> u32 {
    let first = rng.gen_range(1..=D20_SIDES);
    match mode {
        RollMode::Normal => first,
        RollMode::Advantage => first.max(rng.gen_range(1..=D20_SIDES)),
        RollMode::Disadvantage => first.min(rng.gen_range(1..=D20_SIDES)),
    }
}

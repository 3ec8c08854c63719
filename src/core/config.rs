//! Simulation configuration with documented constants
//!
//! Tunable values for a combat run. Rule constants that are fixed by the
//! game system (die faces, effect durations) live in `combat::constants`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{EncounterError, Result};

/// Largest distance a falling entity may cover in one pass (feet)
pub const MAX_FALL_INCREMENT: f64 = 10_000.0;

/// Smallest fall distance per 1d6 of damage (feet)
pub const MIN_FALL_DAMAGE_STEP: f64 = 1.0;

/// Configuration for one combat run (shared read-only by bulk runs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === PLAYFIELD ===
    /// Upper bound for x and y coordinates (feet)
    ///
    /// Positions are clamped to `0..=grid_size` on both horizontal axes.
    /// Altitude is only clamped at the ground.
    pub grid_size: f64,

    /// Floor of the distance a ranged entity tries to keep from its target
    ///
    /// The standoff is `max(weapon.range - speed, min_standoff)`, so fast
    /// archers with short bows still back off at least this far.
    pub min_standoff: f64,

    // === TERMINATION ===
    /// Round ceiling for a single run
    ///
    /// Two sides that are each immune to the other's damage never finish.
    /// Hitting the ceiling ends the run as a draw with `aborted` set.
    pub max_rounds: u32,

    // === ACTIONS ===
    /// Difficulty class of the Hide check (1d20 + DEX modifier)
    pub hide_dc: i32,

    // === FALLING ===
    /// Distance covered by a falling entity each time it is resolved
    pub fall_increment: f64,

    /// Feet of fall per 1d6 multiplier
    ///
    /// Fall damage is `floor(distance / fall_damage_step) * 1d6`.
    pub fall_damage_step: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: 5000.0,
            min_standoff: 5.0,
            max_rounds: 1000,
            hide_dc: 15,
            fall_increment: 500.0,
            fall_damage_step: 10.0,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML, filling missing keys with defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    ///
    /// Every distance must be finite; NaN fails every range check below.
    pub fn validate(&self) -> Result<()> {
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return Err(EncounterError::InvalidConfig(format!(
                "grid_size must be finite and positive, got {}",
                self.grid_size
            )));
        }

        if !(self.min_standoff.is_finite() && self.min_standoff >= 0.0) {
            return Err(EncounterError::InvalidConfig(format!(
                "min_standoff must be finite and not negative, got {}",
                self.min_standoff
            )));
        }

        if self.max_rounds == 0 {
            return Err(EncounterError::InvalidConfig(
                "max_rounds must be at least 1".into(),
            ));
        }

        if !(self.fall_increment > 0.0 && self.fall_increment <= MAX_FALL_INCREMENT) {
            return Err(EncounterError::InvalidConfig(format!(
                "fall_increment must be in (0, {}], got {}",
                MAX_FALL_INCREMENT, self.fall_increment
            )));
        }

        if !(self.fall_damage_step.is_finite() && self.fall_damage_step >= MIN_FALL_DAMAGE_STEP) {
            return Err(EncounterError::InvalidConfig(format!(
                "fall_damage_step must be finite and at least {}, got {}",
                MIN_FALL_DAMAGE_STEP, self.fall_damage_step
            )));
        }

        Ok(())
    }
}

//! Core definitions shared by every other module

pub mod config;
pub mod error;
pub mod types;

pub use config::SimulationConfig;
pub use error::{EncounterError, Result};
pub use types::{Ability, CombatStyle, Condition, DamageType, Faction, Size, Winner};

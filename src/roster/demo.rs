//! Built-in demo encounter

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::entity::Entity;
use crate::roster::loader::load_roster_str;

/// Aragorn and an Aarakocra Ranger against an Orc and a Wyvern
pub const DEMO_ROSTER: &str = include_str!("../../data/roster.toml");

pub fn demo_roster(config: &SimulationConfig) -> Result<Vec<Entity>> {
    load_roster_str(DEMO_ROSTER, config)
}

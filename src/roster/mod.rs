//! Roster input: TOML loading and the built-in demo

pub mod demo;
pub mod loader;

pub use demo::{demo_roster, DEMO_ROSTER};
pub use loader::{load_roster, load_roster_str, EntityDefinition, RosterFile};

//! Encounter Sim - deterministic turn-based combat resolution

pub mod combat;
pub mod core;
pub mod encounter;
pub mod entity;
pub mod roster;
pub mod simulation;
pub mod spatial;

//! Combat rule constants - fixed by the game system, not tunable per run
//!
//! Per-run knobs (hide DC, round ceiling, fall increments) live in
//! `core::config::SimulationConfig`.

// Dice
pub const D20_SIDES: u32 = 20;
pub const CRITICAL_FACE: u32 = 20;
pub const FALL_DAMAGE_DIE: u32 = 6;

// Largest accepted `NdM` notation; keeps every damage total well inside i32
pub const MAX_DICE_COUNT: u32 = 100;
pub const MAX_DICE_SIDES: u32 = 1000;

// Effect durations, in the affected entity's own turns
pub const DODGE_DURATION: u32 = 2;
pub const DASH_DURATION: u32 = 1;
pub const DISENGAGE_DURATION: u32 = 1;

// Advantage deltas contributed by effects
pub const DODGE_DEFENSE_DELTA: i32 = -1;
pub const HIDE_DEFENSE_DELTA: i32 = -1;

// Default action weights
pub const ATTACK_WEIGHT: u32 = 10;
pub const UTILITY_WEIGHT: u32 = 1;

//! Running a combat: initiative, turns, rounds, and the stats record

pub mod driver;
pub mod initiative;
pub mod stats;
pub mod turn;

pub use driver::{run_combat, validate_roster, Encounter};
pub(crate) use driver::fight;
pub use initiative::roll_initiative;
pub use stats::{AttackTally, CombatStats};
pub use turn::{take_turn, TurnOutcome};

pub mod actions;
pub mod constants;
pub mod damage;
pub mod dice;
pub mod effects;
pub mod falling;
pub mod reactions;
pub mod resolution;
pub mod weapons;

pub use actions::{ActionKind, ActionOutcome, ActionWeights, HideCheck};
pub use damage::{apply_damage, DamageOutcome, Mitigation};
pub use dice::{roll_d20, roll_damage, DiceSpec, RollMode};
pub use effects::{Activation, ActiveEffect, EffectDelta, EffectKind, EffectTracker};
pub use falling::{resolve_fall, FallOutcome};
pub use reactions::{process_reactions, ReactionEvent, ReactionKind};
pub use resolution::{attack_action, resolve_attack, AttackReport, AttackRoll, HitCheck};
pub use weapons::{Weapon, WeaponTable};

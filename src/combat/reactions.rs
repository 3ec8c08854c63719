//! Reactions triggered by another entity's movement

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::resolution::{resolve_attack, AttackRoll};
use crate::core::types::CombatStyle;
use crate::entity::{pair_mut, Entity};
use crate::spatial::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReactionKind {
    OpportunityAttack,
}

impl ReactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReactionKind::OpportunityAttack => "OpportunityAttack",
        }
    }

    /// Melee fighters can punish a retreat; archers cannot
    pub fn defaults_for(style: CombatStyle) -> Vec<ReactionKind> {
        match style {
            CombatStyle::Melee => vec![ReactionKind::OpportunityAttack],
            CombatStyle::Ranged => Vec::new(),
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reaction that fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionEvent {
    pub reactor: usize,
    pub kind: ReactionKind,
    pub roll: AttackRoll,
}

/// True when `mover` left `reactor`'s weapon range by moving from `before`
///
/// Ending exactly at weapon range still counts as in range.
pub fn leaves_reach(reactor: &Entity, before: &Position, after: &Position) -> bool {
    let reach = reactor.weapon.range;
    reactor.position.distance_to(before) <= reach && reactor.position.distance_to(after) > reach
}

/// Give every eligible opponent an opportunity attack against the mover
///
/// A reactor must be alive, opposed to the mover, hold an unused reaction
/// and know the Opportunity Attack reaction. A disengaged mover provokes
/// nothing. Stops early if the mover goes down.
pub fn process_reactions<R: Rng + ?Sized>(
    entities: &mut [Entity],
    mover: usize,
    before: &Position,
    rng: &mut R,
) -> Vec<ReactionEvent> {
    let mut events = Vec::new();
    let Some(moving) = entities.get(mover) else {
        return events;
    };
    if moving.is_disengaged() {
        return events;
    }
    let after = moving.position;
    let opposing = moving.faction.opponent();

    for reactor in 0..entities.len() {
        if reactor == mover {
            continue;
        }
        let Some((reacting, target)) = pair_mut(entities, reactor, mover) else {
            continue;
        };
        if !target.is_alive() {
            break;
        }
        let eligible = reacting.faction == opposing
            && reacting.can_take_reaction()
            && reacting.has_reaction(ReactionKind::OpportunityAttack)
            && leaves_reach(reacting, before, &after);
        if !eligible {
            continue;
        }

        let roll = resolve_attack(reacting, target, rng);
        reacting.use_reaction();
        debug!(
            reactor = %reacting.name,
            target = %target.name,
            hit = roll.hit(),
            dealt = roll.damage.dealt,
            "opportunity attack"
        );
        events.push(ReactionEvent {
            reactor,
            kind: ReactionKind::OpportunityAttack,
            roll,
        });
    }
    events
}

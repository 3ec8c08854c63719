//! One entity's turn
//!
//! Fixed sequence: dead-check, falling, target selection, movement,
//! reaction window, action selection, action resolution, end-of-turn.
//! Every state runs at most once per turn.

use rand::Rng;
use tracing::{debug, trace};

use crate::combat::actions::{perform, ActionKind, ActionOutcome};
use crate::combat::falling::{resolve_fall, FallOutcome};
use crate::combat::reactions::process_reactions;
use crate::core::config::SimulationConfig;
use crate::core::types::CombatStyle;
use crate::encounter::stats::CombatStats;
use crate::entity::{pair_mut, Entity};
use crate::spatial::nearest;

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnOutcome {
    /// Entity was already down
    Skipped,
    /// Falling took the whole turn
    Fell(FallOutcome),
    /// An opportunity attack dropped the mover
    DownedWhileMoving { moved: f64 },
    Acted { moved: f64, action: ActionKind },
}

/// Closest living opponent of `actor`, ties to the earlier roster entry
pub fn select_target(entities: &[Entity], actor: usize) -> Option<usize> {
    let me = entities.get(actor)?;
    let opposing = me.faction.opponent();
    nearest(
        &me.position,
        entities
            .iter()
            .enumerate()
            .filter(|(_, other)| other.faction == opposing && other.is_alive())
            .map(|(idx, other)| (idx, &other.position)),
    )
}

/// Move toward (melee) or away from (ranged) the target; returns feet moved
pub fn move_entity(
    entities: &mut [Entity],
    actor: usize,
    target: usize,
    config: &SimulationConfig,
) -> f64 {
    let Some(goal) = entities.get(target).map(|t| t.position) else {
        return 0.0;
    };
    let Some(mover) = entities.get_mut(actor) else {
        return 0.0;
    };
    let budget = mover.movement_budget();
    let moved = match mover.combat_style {
        CombatStyle::Melee => mover.position.advance_within(&goal, budget, mover.weapon.range),
        CombatStyle::Ranged => {
            let standoff = (mover.weapon.range - f64::from(mover.speed)).max(config.min_standoff);
            mover.position.retreat_to(&goal, budget, standoff)
        }
    };
    trace!(entity = %mover.name, moved, budget, "movement");
    moved
}

/// Run one full turn for `actor`
pub fn take_turn<R: Rng + ?Sized>(
    entities: &mut [Entity],
    actor: usize,
    stats: &mut CombatStats,
    rng: &mut R,
    config: &SimulationConfig,
) -> TurnOutcome {
    // 1. Dead-check
    let Some(entity) = entities.get_mut(actor) else {
        return TurnOutcome::Skipped;
    };
    if !entity.is_alive() {
        return TurnOutcome::Skipped;
    }
    stats.record_turn(&entity.name);

    // 2. Falling preempts everything else
    if entity.is_falling() {
        let outcome = resolve_fall(entity, rng, config);
        if let FallOutcome::Landed { damage, .. } = outcome {
            stats.record_fall(&entity.name, damage);
        }
        stats.record_movement(&entity.name, 0.0);
        end_turn(entity);
        return TurnOutcome::Fell(outcome);
    }

    // 3. Target selection
    let target = select_target(entities, actor);

    // 4. Movement, 5. reaction window
    let mut moved = 0.0;
    if let Some(target) = target {
        let before = entities[actor].position;
        moved = move_entity(entities, actor, target, config);
        stats.record_movement(&entities[actor].name, moved);
        if moved > 0.0 {
            let events = process_reactions(entities, actor, &before, rng);
            for event in &events {
                let reactor = &entities[event.reactor].name;
                stats.record_reaction(reactor, event.kind);
                stats.record_attack(reactor, &entities[actor].name, &event.roll);
            }
            if !entities[actor].is_alive() {
                debug!(entity = %entities[actor].name, "downed by opportunity attack");
                return TurnOutcome::DownedWhileMoving { moved };
            }
        }
    } else {
        stats.record_movement(&entities[actor].name, 0.0);
    }

    // 6. Action selection
    let action = entities[actor].actions.select(rng, target.is_some());

    // 7. Action resolution
    let outcome = match target {
        Some(target) => match pair_mut(entities, actor, target) {
            Some((me, foe)) => perform(action, me, Some(foe), rng, config.hide_dc),
            None => ActionOutcome::NoTarget,
        },
        None => perform(action, &mut entities[actor], None, rng, config.hide_dc),
    };
    stats.record_action(&entities[actor].name, action);
    if let (ActionOutcome::Attack(report), Some(target)) = (&outcome, target) {
        for roll in &report.rolls {
            stats.record_attack(&entities[actor].name, &entities[target].name, roll);
        }
    }

    // 8. End of turn
    end_turn(&mut entities[actor]);
    TurnOutcome::Acted { moved, action }
}

/// Tick effects, restore the reaction, and shake off surprise
fn end_turn(entity: &mut Entity) {
    let expired = entity.tick_effects();
    if !expired.is_empty() {
        trace!(entity = %entity.name, ?expired, "effects expired");
    }
    entity.reset_reaction();
    entity.is_surprised = false;
}

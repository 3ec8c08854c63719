//! Combat driver: initiative once, then rounds until one side is down

use std::collections::BTreeSet;

use rand::Rng;
use tracing::{info, warn};

use crate::core::config::SimulationConfig;
use crate::core::error::{EncounterError, Result};
use crate::core::types::{Faction, Winner};
use crate::encounter::initiative::roll_initiative;
use crate::encounter::stats::CombatStats;
use crate::encounter::turn::take_turn;
use crate::entity::Entity;

/// A validated roster ready to fight
#[derive(Debug, Clone)]
pub struct Encounter {
    entities: Vec<Entity>,
    config: SimulationConfig,
}

impl Encounter {
    /// Checks the config and that participant names are unique
    pub fn new(entities: Vec<Entity>, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        validate_roster(&entities)?;
        Ok(Self { entities, config })
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Fight on a copy of the roster, leaving this encounter reusable
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> CombatStats {
        let mut roster = self.entities.clone();
        fight(&mut roster, rng, &self.config)
    }

    /// Fight on the roster itself, returning the final entity states too
    pub fn run_in_place<R: Rng + ?Sized>(mut self, rng: &mut R) -> (CombatStats, Vec<Entity>) {
        let stats = fight(&mut self.entities, rng, &self.config);
        (stats, self.entities)
    }
}

/// Stats are keyed by name, so every participant needs its own
pub fn validate_roster(entities: &[Entity]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for entity in entities {
        if !seen.insert(entity.name.as_str()) {
            return Err(EncounterError::InvalidEntity(format!(
                "duplicate entity name {}",
                entity.name
            )));
        }
    }
    Ok(())
}

fn faction_alive(entities: &[Entity], faction: Faction) -> bool {
    entities
        .iter()
        .any(|entity| entity.faction == faction && entity.is_alive())
}

/// Mean distance over every living party/enemy pair, `None` without a pair
fn mean_opposing_distance(entities: &[Entity]) -> Option<f64> {
    let living = |faction: Faction| {
        entities
            .iter()
            .filter(move |entity| entity.faction == faction && entity.is_alive())
    };
    let (total, pairs) = living(Faction::Party)
        .flat_map(|hero| {
            living(Faction::Enemy).map(move |foe| hero.position.distance_to(&foe.position))
        })
        .fold((0.0, 0usize), |(total, pairs), distance| {
            (total + distance, pairs + 1)
        });
    if pairs == 0 {
        None
    } else {
        Some(total / pairs as f64)
    }
}

/// Run one combat to completion
///
/// Ends when a side has no living members, when nobody is left, or when
/// the round ceiling is hit (recorded as an aborted draw). The roster and
/// config are checked first.
pub fn run_combat<R: Rng + ?Sized>(
    entities: &mut [Entity],
    rng: &mut R,
    config: &SimulationConfig,
) -> Result<CombatStats> {
    config.validate()?;
    validate_roster(entities)?;
    Ok(fight(entities, rng, config))
}

/// Combat loop over an already validated roster
pub(crate) fn fight<R: Rng + ?Sized>(
    entities: &mut [Entity],
    rng: &mut R,
    config: &SimulationConfig,
) -> CombatStats {
    let mut stats = CombatStats::new(entities.iter().map(|entity| entity.name.as_str()));

    for entity in entities.iter_mut() {
        entity.start_flying();
    }
    let order = roll_initiative(entities, rng);
    stats.initiative_order = order.iter().map(|&idx| entities[idx].name.clone()).collect();
    info!(participants = entities.len(), order = ?stats.initiative_order, "combat started");

    loop {
        if stats.rounds >= config.max_rounds {
            stats.aborted = true;
            warn!(rounds = stats.rounds, "round ceiling reached, combat aborted");
            break;
        }
        stats.begin_round();

        let active: Vec<usize> = order
            .iter()
            .copied()
            .filter(|&idx| entities[idx].is_alive())
            .collect();
        if active.is_empty() {
            break;
        }

        for idx in active {
            take_turn(entities, idx, &mut stats, rng, config);
        }
        if let Some(spacing) = mean_opposing_distance(entities) {
            stats.record_spacing(spacing);
        }

        if !faction_alive(entities, Faction::Party) {
            stats.winner = Winner::Enemies;
            break;
        }
        if !faction_alive(entities, Faction::Enemy) {
            stats.winner = Winner::Party;
            break;
        }
    }

    info!(
        winner = %stats.winner,
        rounds = stats.rounds,
        aborted = stats.aborted,
        "combat finished"
    );
    stats
}

//! Many independent runs of the same encounter
//!
//! Each run gets its own copy of the roster and its own ChaCha stream
//! seeded from `seed + run_index`, so results do not depend on how rayon
//! schedules the work.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::Winner;
use crate::encounter::{fight, validate_roster, CombatStats};
use crate::entity::Entity;

/// Run `runs` combats in parallel; results come back in run order
///
/// The roster and config are checked once, before any run starts.
pub fn run_bulk(
    roster: &[Entity],
    runs: u32,
    seed: u64,
    config: &SimulationConfig,
) -> Result<Vec<CombatStats>> {
    config.validate()?;
    validate_roster(roster)?;

    let results: Vec<CombatStats> = (0..runs)
        .into_par_iter()
        .map(|run| {
            let mut entities = roster.to_vec();
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(u64::from(run)));
            fight(&mut entities, &mut rng, config)
        })
        .collect();

    if !results.is_empty() {
        let summary = BulkSummary::from_runs(&results);
        info!(
            runs = summary.runs,
            party_wins = summary.party_wins,
            enemy_wins = summary.enemy_wins,
            draws = summary.draws,
            mean_rounds = summary.mean_rounds,
            mean_distance_moved = summary.mean_distance_moved_per_turn,
            "bulk simulation finished"
        );
    }
    Ok(results)
}

/// One flattened row per run
pub fn flatten_runs(results: &[CombatStats]) -> Vec<BTreeMap<String, Value>> {
    results.iter().map(CombatStats::flatten).collect()
}

/// Outcome counts across a batch of runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkSummary {
    pub runs: usize,
    pub party_wins: usize,
    pub enemy_wins: usize,
    /// Runs with no winner (aborted or empty)
    pub draws: usize,
    pub aborted: usize,
    pub party_win_rate: f64,
    pub mean_rounds: f64,
    /// Mean over runs of the feet moved per turn
    pub mean_distance_moved_per_turn: f64,
    /// Mean over runs of the share of turns with movement, in percent
    pub percentage_turns_moved: f64,
    /// Mean over runs of the per-round opposing-pair distance
    pub mean_distance_between_entities: f64,
}

impl BulkSummary {
    pub fn from_runs(results: &[CombatStats]) -> Self {
        let mut summary = BulkSummary {
            runs: results.len(),
            ..Default::default()
        };
        let mut total_rounds = 0u64;
        let (mut moved, mut moved_share, mut spacing) = (0.0, 0.0, 0.0);
        for stats in results {
            match stats.winner {
                Winner::Party => summary.party_wins += 1,
                Winner::Enemies => summary.enemy_wins += 1,
                Winner::None => summary.draws += 1,
            }
            if stats.aborted {
                summary.aborted += 1;
            }
            total_rounds += u64::from(stats.rounds);
            moved += stats.overall_distance_moved();
            moved_share += stats.overall_percentage_turns_moved();
            spacing += stats.mean_distance_between_entities();
        }
        if summary.runs > 0 {
            let runs = summary.runs as f64;
            summary.party_win_rate = summary.party_wins as f64 / runs;
            summary.mean_rounds = total_rounds as f64 / runs;
            summary.mean_distance_moved_per_turn = moved / runs;
            summary.percentage_turns_moved = moved_share / runs;
            summary.mean_distance_between_entities = spacing / runs;
        }
        summary
    }

    pub fn report(&self) -> String {
        [
            format!(
                "{} runs: party {} / enemies {} / draws {} ({} aborted)",
                self.runs, self.party_wins, self.enemy_wins, self.draws, self.aborted,
            ),
            format!(
                "party win rate {:.1}%, mean rounds {:.2}",
                self.party_win_rate * 100.0,
                self.mean_rounds,
            ),
            format!(
                "moved {:.1} ft per turn, {:.1}% of turns with movement, mean spacing {:.1} ft",
                self.mean_distance_moved_per_turn,
                self.percentage_turns_moved,
                self.mean_distance_between_entities,
            ),
        ]
        .join("\n")
    }
}

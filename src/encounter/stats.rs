//! Per-run statistics record
//!
//! Created with a zeroed entry for every participant, filled in while the
//! run executes, and handed back at the end. `flatten` turns it into one
//! row of named scalar columns for downstream analysis.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::combat::actions::ActionKind;
use crate::combat::reactions::ReactionKind;
use crate::combat::resolution::AttackRoll;
use crate::core::types::Winner;

/// Hit/miss/critical counts for one attacker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackTally {
    pub hits: u32,
    pub misses: u32,
    pub criticals: u32,
}

impl AttackTally {
    pub fn attempts(&self) -> u32 {
        self.hits + self.misses
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub winner: Winner,
    pub rounds: u32,
    /// The round ceiling ended the run
    pub aborted: bool,
    pub initiative_order: Vec<String>,
    /// Damage after mitigation, credited to the attacker
    pub damage_dealt: BTreeMap<String, u32>,
    /// Hitpoints lost from any source, falls included
    pub damage_taken: BTreeMap<String, u32>,
    /// One entry per round: damage dealt by this participant that round
    pub damage_per_round: BTreeMap<String, Vec<u32>>,
    pub turns_survived: BTreeMap<String, u32>,
    pub actions_used: BTreeMap<String, BTreeMap<ActionKind, u32>>,
    pub reactions_used: BTreeMap<String, BTreeMap<ReactionKind, u32>>,
    pub attack_rolls: BTreeMap<String, AttackTally>,
    /// One entry per turn taken: feet moved (0.0 for a fall or no move)
    pub distance_moved_per_turn: BTreeMap<String, Vec<f64>>,
    /// Turns in which the participant moved at all
    pub turns_moved: BTreeMap<String, u32>,
    /// One entry per round: mean distance between living opposing pairs
    ///
    /// Rounds that end with no such pair add nothing.
    pub average_distance_between_entities: Vec<f64>,
}

fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn percentage(part: u32, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) * 100.0 / whole as f64
    }
}

impl CombatStats {
    /// Zeroed record for the given participants
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut stats = Self::default();
        for name in names {
            let name = name.to_string();
            stats.damage_dealt.insert(name.clone(), 0);
            stats.damage_taken.insert(name.clone(), 0);
            stats.damage_per_round.insert(name.clone(), Vec::new());
            stats.turns_survived.insert(name.clone(), 0);
            stats.actions_used.insert(
                name.clone(),
                ActionKind::ALL.into_iter().map(|kind| (kind, 0)).collect(),
            );
            stats.reactions_used.insert(
                name.clone(),
                BTreeMap::from([(ReactionKind::OpportunityAttack, 0)]),
            );
            stats.distance_moved_per_turn.insert(name.clone(), Vec::new());
            stats.turns_moved.insert(name.clone(), 0);
            stats.attack_rolls.insert(name, AttackTally::default());
        }
        stats
    }

    /// Open a new round: counter plus an empty damage slot per participant
    pub fn begin_round(&mut self) {
        self.rounds += 1;
        for per_round in self.damage_per_round.values_mut() {
            per_round.push(0);
        }
    }

    pub fn record_turn(&mut self, name: &str) {
        *self.turns_survived.entry(name.to_string()).or_default() += 1;
    }

    pub fn record_action(&mut self, name: &str, action: ActionKind) {
        *self
            .actions_used
            .entry(name.to_string())
            .or_default()
            .entry(action)
            .or_default() += 1;
    }

    pub fn record_reaction(&mut self, name: &str, reaction: ReactionKind) {
        *self
            .reactions_used
            .entry(name.to_string())
            .or_default()
            .entry(reaction)
            .or_default() += 1;
    }

    /// Credit one attack roll to `attacker` and its damage to `target`
    pub fn record_attack(&mut self, attacker: &str, target: &str, roll: &AttackRoll) {
        let tally = self.attack_rolls.entry(attacker.to_string()).or_default();
        if roll.hit() {
            tally.hits += 1;
        } else {
            tally.misses += 1;
        }
        if roll.critical() {
            tally.criticals += 1;
        }

        let dealt = roll.damage.dealt;
        *self.damage_dealt.entry(attacker.to_string()).or_default() += dealt;
        *self.damage_taken.entry(target.to_string()).or_default() += roll.damage.lost;
        let per_round = self.damage_per_round.entry(attacker.to_string()).or_default();
        match per_round.last_mut() {
            Some(current) => *current += dealt,
            None => per_round.push(dealt),
        }
    }

    /// One entry per turn taken, whether or not the entity moved
    pub fn record_movement(&mut self, name: &str, moved: f64) {
        self.distance_moved_per_turn
            .entry(name.to_string())
            .or_default()
            .push(moved);
        if moved > 0.0 {
            *self.turns_moved.entry(name.to_string()).or_default() += 1;
        }
    }

    pub fn record_spacing(&mut self, mean_distance: f64) {
        self.average_distance_between_entities.push(mean_distance);
    }

    /// Mean feet moved per turn by `name`, 0 before any turn
    pub fn mean_distance_moved(&self, name: &str) -> f64 {
        mean(self.distance_moved_per_turn.get(name).into_iter().flatten().copied())
    }

    /// Share of `name`'s turns that included movement, in percent
    pub fn percentage_turns_moved(&self, name: &str) -> f64 {
        let turns = self.distance_moved_per_turn.get(name).map_or(0, Vec::len);
        percentage(self.turns_moved.get(name).copied().unwrap_or_default(), turns)
    }

    /// Mean feet moved per turn over every participant's turns
    pub fn overall_distance_moved(&self) -> f64 {
        mean(self.distance_moved_per_turn.values().flatten().copied())
    }

    /// Share of all turns that included movement, in percent
    pub fn overall_percentage_turns_moved(&self) -> f64 {
        let turns = self.distance_moved_per_turn.values().map(Vec::len).sum::<usize>();
        percentage(self.turns_moved.values().sum(), turns)
    }

    /// Mean of the per-round opposing-pair distances
    pub fn mean_distance_between_entities(&self) -> f64 {
        mean(self.average_distance_between_entities.iter().copied())
    }

    /// Fall damage has no attacker
    pub fn record_fall(&mut self, name: &str, damage: u32) {
        *self.damage_taken.entry(name.to_string()).or_default() += damage;
    }

    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.turns_survived.keys().map(String::as_str)
    }

    /// One row of named columns
    pub fn flatten(&self) -> BTreeMap<String, Value> {
        let mut row = BTreeMap::new();
        row.insert("winner".to_string(), Value::from(self.winner.as_str()));
        row.insert("rounds".to_string(), Value::from(self.rounds));
        row.insert("aborted".to_string(), Value::from(self.aborted));

        for (name, value) in &self.damage_dealt {
            row.insert(format!("damage_dealt_{name}"), Value::from(*value));
        }
        for (name, value) in &self.damage_taken {
            row.insert(format!("damage_taken_{name}"), Value::from(*value));
        }
        for (name, value) in &self.turns_survived {
            row.insert(format!("turns_survived_{name}"), Value::from(*value));
        }
        for (name, per_round) in &self.damage_per_round {
            row.insert(format!("damage_per_round_{name}"), Value::from(per_round.clone()));
        }
        for (name, actions) in &self.actions_used {
            for (action, count) in actions {
                row.insert(format!("actions_used_{name}_{action}"), Value::from(*count));
            }
        }
        for (name, reactions) in &self.reactions_used {
            for (reaction, count) in reactions {
                row.insert(format!("reactions_used_{name}_{reaction}"), Value::from(*count));
            }
        }
        for (name, tally) in &self.attack_rolls {
            row.insert(format!("hits_{name}"), Value::from(tally.hits));
            row.insert(format!("misses_{name}"), Value::from(tally.misses));
        }
        for (name, moves) in &self.distance_moved_per_turn {
            row.insert(format!("distance_moved_per_turn_{name}"), Value::from(moves.clone()));
            row.insert(
                format!("percentage_turns_moved_{name}"),
                Value::from(self.percentage_turns_moved(name)),
            );
        }
        for (name, count) in &self.turns_moved {
            row.insert(format!("turns_moved_{name}"), Value::from(*count));
        }
        row.insert(
            "average_distance_between_entities".to_string(),
            Value::from(self.average_distance_between_entities.clone()),
        );
        row
    }

    pub fn summary(&self) -> String {
        let status = if self.aborted { " (aborted)" } else { "" };
        let mut lines = vec![format!(
            "Winner: {} after {} rounds{}, mean spacing {:.1} ft",
            self.winner,
            self.rounds,
            status,
            self.mean_distance_between_entities()
        )];
        for name in self.participants() {
            let tally = self.attack_rolls.get(name).copied().unwrap_or_default();
            lines.push(format!(
                "  {:<20} dealt {:>4}  taken {:>4}  turns {:>3}  hits {}/{}  moved {:.1} ({:.0}%)",
                name,
                self.damage_dealt.get(name).copied().unwrap_or_default(),
                self.damage_taken.get(name).copied().unwrap_or_default(),
                self.turns_survived.get(name).copied().unwrap_or_default(),
                tally.hits,
                tally.attempts(),
                self.mean_distance_moved(name),
                self.percentage_turns_moved(name),
            ));
        }
        lines.join("\n")
    }
}

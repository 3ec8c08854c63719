//! Attack resolution
//!
//! One attack is a d20 roll under the net advantage mode, plus the weapon
//! ability modifier and proficiency, against the target's AC. Hits roll the
//! weapon dice (doubled on a natural 20) and add the same modifier.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::constants::CRITICAL_FACE;
use crate::combat::damage::{apply_damage, DamageOutcome};
use crate::combat::dice::{roll_d20, RollMode};
use crate::combat::effects::EffectKind;
use crate::entity::Entity;

/// Outcome of comparing one kept d20 against a target's AC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitCheck {
    pub raw: u32,
    pub total: i32,
    pub hit: bool,
    pub critical: bool,
}

impl HitCheck {
    /// Hit iff `raw + bonus >= ac`; critical iff a hit on the critical face
    pub fn evaluate(raw: u32, bonus: i32, ac: i32) -> Self {
        let total = raw as i32 + bonus;
        let hit = total >= ac;
        Self {
            raw,
            total,
            hit,
            critical: hit && raw == CRITICAL_FACE,
        }
    }
}

/// Full record of one attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRoll {
    pub mode: RollMode,
    pub check: HitCheck,
    /// Zero on a miss
    pub damage: DamageOutcome,
}

impl AttackRoll {
    pub fn hit(&self) -> bool {
        self.check.hit
    }

    pub fn critical(&self) -> bool {
        self.check.critical
    }
}

/// Every attack made by one Attack action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    pub rolls: Vec<AttackRoll>,
}

impl AttackReport {
    pub fn damage_dealt(&self) -> u32 {
        self.rolls.iter().map(|roll| roll.damage.dealt).sum()
    }

    pub fn hits(&self) -> usize {
        self.rolls.iter().filter(|roll| roll.hit()).count()
    }
}

/// Ability modifier plus proficiency for the attacker's weapon
pub fn attack_bonus(attacker: &Entity) -> i32 {
    attacker.modifier(attacker.weapon.ability) + attacker.proficiency_bonus
}

/// Roll mode from the attacker's and target's advantage counters
pub fn roll_mode(attacker: &Entity, target: &Entity) -> RollMode {
    RollMode::from_net(attacker.attack_advantage + target.defense_advantage)
}

/// Resolve a single attack and apply its damage
///
/// The roll is made against the target as it stands; a hidden target is
/// revealed once the roll is made.
pub fn resolve_attack<R: Rng + ?Sized>(
    attacker: &Entity,
    target: &mut Entity,
    rng: &mut R,
) -> AttackRoll {
    let mode = roll_mode(attacker, target);
    let raw = roll_d20(mode, rng);
    let check = HitCheck::evaluate(raw, attack_bonus(attacker), target.ac);

    if target.end_effect(EffectKind::Hide) {
        debug!(target = %target.name, "hidden target revealed by attack");
    }

    let damage = if check.hit {
        let weapon = &attacker.weapon;
        let mut dice = i32::try_from(weapon.damage_dice.roll(rng)).unwrap_or(i32::MAX);
        if check.critical {
            dice = dice.saturating_mul(2);
        }
        let raw_damage = dice.saturating_add(attacker.modifier(weapon.ability));
        apply_damage(target, raw_damage, weapon.damage_type)
    } else {
        DamageOutcome::default()
    };

    debug!(
        attacker = %attacker.name,
        target = %target.name,
        ?mode,
        raw,
        total = check.total,
        ac = target.ac,
        hit = check.hit,
        critical = check.critical,
        dealt = damage.dealt,
        "attack"
    );

    AttackRoll {
        mode,
        check,
        damage,
    }
}

/// The Attack action: up to `attack_count` attacks against one target
///
/// Attacking gives away the attacker's own hiding spot. The sequence stops
/// once the target is down.
pub fn attack_action<R: Rng + ?Sized>(
    attacker: &mut Entity,
    target: &mut Entity,
    rng: &mut R,
) -> AttackReport {
    attacker.end_effect(EffectKind::Hide);

    let mut report = AttackReport::default();
    for _ in 0..attacker.attack_count() {
        if !target.is_alive() {
            break;
        }
        report.rolls.push(resolve_attack(attacker, target, rng));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::dice::DiceSpec;
    use crate::combat::weapons::Weapon;
    use crate::core::types::{Ability, DamageType};
    use crate::entity::{AbilityScores, EntityBuilder};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn knight() -> Entity {
        // STR 20 -> +5, proficiency +3: minimum total is 9
        EntityBuilder::party("Knight", "Paladin", "Devotion", 5)
            .abilities(AbilityScores::new(20, 10, 14, 10, 12, 16))
            .proficiency_bonus(3)
            .hitpoints(45)
            .weapon(Arc::new(Weapon::longsword()))
            .build()
            .unwrap()
    }

    fn goblin(ac: i32, hp: u32) -> Entity {
        EntityBuilder::enemy("Goblin", false, 1)
            .ac(ac)
            .hitpoints(hp)
            .weapon(Arc::new(Weapon::dagger()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_hit_is_total_at_least_ac() {
        assert!(HitCheck::evaluate(10, 5, 15).hit);
        assert!(!HitCheck::evaluate(9, 5, 15).hit);
    }

    #[test]
    fn test_natural_twenty_hit_is_critical() {
        let check = HitCheck::evaluate(20, 0, 12);
        assert!(check.hit && check.critical);
        // A natural 20 that still misses is not a critical
        let check = HitCheck::evaluate(20, -10, 12);
        assert!(!check.hit && !check.critical);
        // A high total without a natural 20 is not a critical
        assert!(!HitCheck::evaluate(15, 5, 12).critical);
    }

    #[test]
    fn test_minimum_roll_still_hits_when_bonus_beats_ac() {
        let knight = knight();
        let mut target = goblin(9, 200);
        let mut rng = StepRng::new(0, 0);
        let roll = resolve_attack(&knight, &mut target, &mut rng);
        assert_eq!(roll.check.raw, 1);
        assert!(roll.hit());
        // 1d8 minimum 1 plus STR +5
        assert_eq!(roll.damage.dealt, 6);
        assert_eq!(target.hitpoints.current(), 194);
    }

    #[test]
    fn test_minimum_roll_misses_high_ac() {
        let knight = knight();
        let mut target = goblin(10, 20);
        let roll = resolve_attack(&knight, &mut target, &mut StepRng::new(0, 0));
        assert!(!roll.hit());
        assert_eq!(target.hitpoints.current(), 20);
    }

    #[test]
    fn test_cancelling_advantage_rolls_normally() {
        let mut knight = knight();
        knight.attack_advantage = 1;
        let mut target = goblin(12, 50);
        target.defense_advantage = -1;
        assert_eq!(roll_mode(&knight, &target), RollMode::Normal);

        // Normal mode draws exactly one die, like a bare roll_d20
        let mut a = ChaCha8Rng::seed_from_u64(11);
        let mut b = ChaCha8Rng::seed_from_u64(11);
        let roll = resolve_attack(&knight, &mut target, &mut a);
        assert_eq!(roll.check.raw, roll_d20(RollMode::Normal, &mut b));
    }

    #[test]
    fn test_multiattack_stops_when_target_drops() {
        let mut orc = EntityBuilder::enemy("Orc", true, 3)
            .abilities(AbilityScores::new(30, 10, 10, 10, 10, 10))
            .hitpoints(15)
            .weapon(Arc::new(Weapon::battleaxe()))
            .build()
            .unwrap();
        let mut target = goblin(1, 5);
        let report = attack_action(&mut orc, &mut target, &mut StepRng::new(0, 0));
        assert_eq!(report.rolls.len(), 1);
        assert!(!target.is_alive());
    }

    #[test]
    fn test_multiattack_makes_every_attack() {
        let mut orc = EntityBuilder::enemy("Orc", true, 2)
            .hitpoints(15)
            .weapon(Arc::new(Weapon::battleaxe()))
            .build()
            .unwrap();
        let mut target = goblin(30, 50);
        let report = attack_action(&mut orc, &mut target, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(report.rolls.len(), 2);
        assert_eq!(report.hits(), 0);
    }

    #[test]
    fn test_attack_reveals_hidden_target_and_attacker() {
        let mut knight = knight();
        knight.activate_effect(EffectKind::Hide);
        let mut target = goblin(9, 100);
        target.activate_effect(EffectKind::Hide);
        assert_eq!(target.defense_advantage, -1);

        attack_action(&mut knight, &mut target, &mut StepRng::new(0, 0));
        assert!(!knight.is_hidden());
        assert!(!target.is_hidden());
        assert_eq!(knight.defense_advantage, 0);
        assert_eq!(target.defense_advantage, 0);
    }

    #[test]
    fn test_oversized_dice_saturate_instead_of_overflowing() {
        // Struct literal skips the notation limits
        let huge = Weapon::new(
            "siege",
            DiceSpec { count: 5000, sides: u32::MAX },
            Ability::Strength,
            DamageType::Bludgeoning,
            5.0,
        );
        let mut knight = knight();
        knight.weapon = Arc::new(huge);
        let mut target = goblin(1, u32::MAX);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..40 {
            let roll = resolve_attack(&knight, &mut target, &mut rng);
            assert!(roll.hit());
            assert!(roll.damage.dealt > 0);
        }
    }

    #[test]
    fn test_immune_target_unharmed_by_hits() {
        let knight = knight();
        let mut target = EntityBuilder::enemy("Golem", false, 1)
            .ac(1)
            .hitpoints(30)
            .weapon(Arc::new(Weapon::claws()))
            .immunities([DamageType::Slashing])
            .build()
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..20 {
            let roll = resolve_attack(&knight, &mut target, &mut rng);
            assert!(roll.hit());
            assert_eq!(roll.damage.dealt, 0);
        }
        assert_eq!(target.hitpoints.current(), 30);
    }
}

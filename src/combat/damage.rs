//! Damage mitigation and application
//!
//! Immunity beats resistance. Any positive raw damage that is not negated
//! by immunity deals at least 1.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::DamageType;
use crate::entity::Entity;

/// How a target relates to a damage type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mitigation {
    None,
    Resistant,
    Immune,
}

impl Mitigation {
    pub fn for_target(target: &Entity, damage_type: DamageType) -> Self {
        if target.is_immune(damage_type) {
            Mitigation::Immune
        } else if target.is_resistant(damage_type) {
            Mitigation::Resistant
        } else {
            Mitigation::None
        }
    }

    /// Final damage for a raw amount
    pub fn apply(self, raw: i32) -> u32 {
        if raw <= 0 {
            return 0;
        }
        let raw = raw.unsigned_abs();
        match self {
            Mitigation::Immune => 0,
            Mitigation::Resistant => (raw / 2).max(1),
            Mitigation::None => raw,
        }
    }
}

/// Result of applying one hit's damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Damage after mitigation, credited to the attacker
    pub dealt: u32,
    /// Hitpoints the target actually lost (capped by what it had left)
    pub lost: u32,
}

/// Mitigate `raw` damage of `damage_type` and subtract it from the target
pub fn apply_damage(target: &mut Entity, raw: i32, damage_type: DamageType) -> DamageOutcome {
    let mitigation = Mitigation::for_target(target, damage_type);
    let dealt = mitigation.apply(raw);
    let lost = target.hitpoints.take_damage(dealt);
    debug!(
        target = %target.name,
        raw,
        %damage_type,
        ?mitigation,
        dealt,
        hp = target.hitpoints.current(),
        "damage applied"
    );
    DamageOutcome { dealt, lost }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::weapons::Weapon;
    use crate::entity::EntityBuilder;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn target() -> Entity {
        EntityBuilder::enemy("Wyvern", false, 1)
            .hitpoints(30)
            .weapon(Arc::new(Weapon::claws()))
            .resistances([DamageType::Piercing])
            .immunities([DamageType::Poison])
            .build()
            .unwrap()
    }

    #[test]
    fn test_immune_takes_nothing() {
        let mut wyvern = target();
        let outcome = apply_damage(&mut wyvern, 25, DamageType::Poison);
        assert_eq!(outcome, DamageOutcome { dealt: 0, lost: 0 });
        assert_eq!(wyvern.hitpoints.current(), 30);
    }

    #[test]
    fn test_resistant_halves_with_floor_of_one() {
        assert_eq!(Mitigation::Resistant.apply(9), 4);
        assert_eq!(Mitigation::Resistant.apply(1), 1);
        assert_eq!(Mitigation::Resistant.apply(0), 0);

        let mut wyvern = target();
        apply_damage(&mut wyvern, 9, DamageType::Piercing);
        assert_eq!(wyvern.hitpoints.current(), 26);
    }

    #[test]
    fn test_non_positive_raw_deals_nothing() {
        assert_eq!(Mitigation::None.apply(0), 0);
        assert_eq!(Mitigation::None.apply(-3), 0);
        assert_eq!(Mitigation::None.apply(7), 7);
    }

    #[test]
    fn test_overkill_caps_hitpoints_lost() {
        let mut wyvern = target();
        let outcome = apply_damage(&mut wyvern, 100, DamageType::Slashing);
        assert_eq!(outcome.dealt, 100);
        assert_eq!(outcome.lost, 30);
        assert_eq!(wyvern.hitpoints.current(), 0);
    }

    proptest! {
        #[test]
        fn prop_resistance_rule(raw in 1i32..500) {
            let expected = ((raw / 2) as u32).max(1);
            prop_assert_eq!(Mitigation::Resistant.apply(raw), expected);
        }

        #[test]
        fn prop_hitpoints_stay_in_bounds(hits in proptest::collection::vec(-5i32..60, 0..20)) {
            let mut wyvern = target();
            for raw in hits {
                apply_damage(&mut wyvern, raw, DamageType::Slashing);
                prop_assert!(wyvern.hitpoints.current() <= wyvern.hitpoints.max());
            }
        }
    }
}

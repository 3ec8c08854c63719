//! Initiative: one d20 + bonus per entity, rolled once per combat

use rand::Rng;
use tracing::debug;

use crate::combat::constants::D20_SIDES;
use crate::entity::Entity;

/// Roll initiative for everyone and return roster indices in turn order
///
/// Highest total acts first. Ties keep roster order, so a fixed random
/// stream always yields the same order. Totals are stored on each entity.
pub fn roll_initiative<R: Rng + ?Sized>(entities: &mut [Entity], rng: &mut R) -> Vec<usize> {
    for entity in entities.iter_mut() {
        let roll = rng.gen_range(1..=D20_SIDES) as i32;
        let total = roll + entity.initiative_bonus;
        entity.initiative_total = Some(total);
        debug!(entity = %entity.name, roll, total, "initiative");
    }

    let mut order: Vec<usize> = (0..entities.len()).collect();
    // sort_by_key is stable
    order.sort_by_key(|&idx| std::cmp::Reverse(entities[idx].initiative_total.unwrap_or(i32::MIN)));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::weapons::Weapon;
    use crate::entity::EntityBuilder;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn named(name: &str, bonus: i32) -> Entity {
        EntityBuilder::enemy(name, false, 1)
            .initiative_bonus(bonus)
            .weapon(Arc::new(Weapon::claws()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_higher_total_goes_first() {
        let mut entities = vec![named("Slow", 0), named("Fast", 5), named("Middle", 2)];
        // Every d20 comes up 1
        let order = roll_initiative(&mut entities, &mut StepRng::new(0, 0));
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(entities[1].initiative_total, Some(6));
    }

    #[test]
    fn test_ties_keep_roster_order() {
        let mut entities = vec![named("A", 3), named("B", 3), named("C", 3)];
        let order = roll_initiative(&mut entities, &mut StepRng::new(0, 0));
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_same_seed_same_order() {
        let roster: Vec<Entity> = (0..8).map(|i| named(&format!("E{i}"), i % 3)).collect();
        let mut first = roster.clone();
        let mut second = roster;
        let a = roll_initiative(&mut first, &mut ChaCha8Rng::seed_from_u64(77));
        let b = roll_initiative(&mut second, &mut ChaCha8Rng::seed_from_u64(77));
        assert_eq!(a, b);
    }

    #[test]
    fn test_order_is_descending() {
        let mut entities: Vec<Entity> = (0..10).map(|i| named(&format!("E{i}"), i)).collect();
        let order = roll_initiative(&mut entities, &mut ChaCha8Rng::seed_from_u64(3));
        let totals: Vec<i32> = order.iter().filter_map(|&i| entities[i].initiative_total).collect();
        assert!(totals.windows(2).all(|pair| pair[0] >= pair[1]));
    }
}

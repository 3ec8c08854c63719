//! Falling and fall damage
//!
//! A falling entity covers at most `fall_increment` feet each time it is
//! resolved. Altitude stays put until it lands, then snaps to the ground.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::constants::FALL_DAMAGE_DIE;
use crate::core::config::SimulationConfig;
use crate::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FallOutcome {
    /// Still in the air after this pass
    Falling { distance: f64 },
    /// Hit the ground; `damage` is hitpoints lost
    Landed { distance: f64, damage: u32 },
}

/// One resolution pass for a falling entity
///
/// Landing damage is `floor(distance / fall_damage_step) * 1d6` and ignores
/// resistances.
pub fn resolve_fall<R: Rng + ?Sized>(
    entity: &mut Entity,
    rng: &mut R,
    config: &SimulationConfig,
) -> FallOutcome {
    let height = entity.position.z();
    let remaining = (height - entity.fall_distance).max(0.0);
    entity.fall_distance += config.fall_increment.min(remaining);

    if entity.fall_distance < height {
        debug!(entity = %entity.name, distance = entity.fall_distance, height, "falling");
        return FallOutcome::Falling {
            distance: entity.fall_distance,
        };
    }

    let distance = entity.fall_distance;
    // Float-to-int casts saturate, so absurd heights cap rather than wrap
    let multiplier = (distance / config.fall_damage_step).floor() as u32;
    let damage = multiplier.saturating_mul(rng.gen_range(1..=FALL_DAMAGE_DIE));
    let lost = entity.hitpoints.take_damage(damage);
    entity.land();
    debug!(entity = %entity.name, distance, damage, hp = entity.hitpoints.current(), "landed");
    FallOutcome::Landed {
        distance,
        damage: lost,
    }
}

//! Hitpoint pool with the `0 <= current <= max` invariant

use serde::{Deserialize, Serialize};

use crate::core::error::{EncounterError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHitPoints")]
pub struct HitPoints {
    max: u32,
    current: u32,
}

/// Unchecked wire form; deserialization goes through `with_current`
#[derive(Deserialize)]
struct RawHitPoints {
    max: u32,
    current: u32,
}

impl TryFrom<RawHitPoints> for HitPoints {
    type Error = EncounterError;

    fn try_from(raw: RawHitPoints) -> Result<Self> {
        Self::with_current(raw.max, raw.current)
    }
}

impl HitPoints {
    /// A full pool
    pub fn new(max: u32) -> Self {
        Self { max, current: max }
    }

    /// A pool that starts wounded
    pub fn with_current(max: u32, current: u32) -> Result<Self> {
        if current > max {
            return Err(EncounterError::InvalidEntity(format!(
                "current hitpoints {} exceed maximum {}",
                current, max
            )));
        }
        Ok(Self { max, current })
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Subtract damage, flooring at zero; returns the hitpoints actually lost
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current);
        self.current -= lost;
        lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_floors_at_zero() {
        let mut hp = HitPoints::new(10);
        assert_eq!(hp.take_damage(4), 4);
        assert_eq!(hp.current(), 6);
        assert_eq!(hp.take_damage(50), 6);
        assert_eq!(hp.current(), 0);
        assert!(!hp.is_alive());
    }

    #[test]
    fn test_current_above_max_rejected() {
        assert!(HitPoints::with_current(10, 11).is_err());
        assert_eq!(HitPoints::with_current(10, 3).unwrap().current(), 3);
    }

    #[test]
    fn test_deserialize_enforces_invariant() {
        let hp: HitPoints = serde_json::from_str(r#"{"max":12,"current":5}"#).unwrap();
        assert_eq!(hp, HitPoints::with_current(12, 5).unwrap());
        assert!(serde_json::from_str::<HitPoints>(r#"{"max":5,"current":9}"#).is_err());
    }
}

//! Faction-specific extras
//!
//! Party members and enemies differ only in a few descriptive fields and in
//! how many attacks the Attack action makes. Both sit behind `Capabilities`.

use serde::{Deserialize, Serialize};

/// What the engine needs to know about faction-specific extras
pub trait Capabilities {
    /// Number of attacks made by one Attack action
    fn attack_count(&self) -> u32;

    /// Human-readable summary for logs and reports
    fn describe(&self) -> String;
}

/// Class information for a party member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyInfo {
    pub class: String,
    pub subclass: String,
    pub level: u32,
}

impl Capabilities for PartyInfo {
    fn attack_count(&self) -> u32 {
        1
    }

    fn describe(&self) -> String {
        format!("{} ({}) - Level {}", self.class, self.subclass, self.level)
    }
}

/// Attack profile for an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyInfo {
    pub multiattack: bool,
    /// Clamped to at least 1 on construction
    pub attack_count: u32,
}

impl EnemyInfo {
    pub fn new(multiattack: bool, attack_count: u32) -> Self {
        Self {
            multiattack,
            attack_count: attack_count.max(1),
        }
    }
}

impl Default for EnemyInfo {
    fn default() -> Self {
        Self::new(false, 1)
    }
}

impl Capabilities for EnemyInfo {
    fn attack_count(&self) -> u32 {
        if self.multiattack {
            self.attack_count.max(1)
        } else {
            1
        }
    }

    fn describe(&self) -> String {
        if self.multiattack {
            format!("Multiattack x{}", self.attack_count())
        } else {
            "Single attack".to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactionTraits {
    Party(PartyInfo),
    Enemy(EnemyInfo),
}

impl Capabilities for FactionTraits {
    fn attack_count(&self) -> u32 {
        match self {
            FactionTraits::Party(info) => info.attack_count(),
            FactionTraits::Enemy(info) => info.attack_count(),
        }
    }

    fn describe(&self) -> String {
        match self {
            FactionTraits::Party(info) => info.describe(),
            FactionTraits::Enemy(info) => info.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_info_describe() {
        let info = PartyInfo {
            class: "Fighter".into(),
            subclass: "Champion".into(),
            level: 5,
        };
        assert_eq!(info.describe(), "Fighter (Champion) - Level 5");
        assert_eq!(info.attack_count(), 1);
    }

    #[test]
    fn test_multiattack_count() {
        assert_eq!(EnemyInfo::new(true, 2).attack_count(), 2);
        assert_eq!(EnemyInfo::new(false, 3).attack_count(), 1);
    }

    #[test]
    fn test_attack_count_never_zero() {
        let info = EnemyInfo::new(true, 0);
        assert_eq!(info.attack_count, 1);
        assert_eq!(FactionTraits::Enemy(info).attack_count(), 1);
    }
}

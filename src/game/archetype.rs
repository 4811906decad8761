use serde::{Deserialize, Serialize};
use std::fmt;

/// Enemy stat class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Archetype {
    Normal = 0,
    Fast = 1,
    Tank = 2,
    Boss = 3,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Normal,
        Archetype::Fast,
        Archetype::Tank,
        Archetype::Boss,
    ];

    /// Dense index for per-archetype tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stat profile for this archetype
    pub fn profile(self) -> ArchetypeProfile {
        match self {
            Archetype::Normal => ArchetypeProfile {
                speed: 4.0,
                max_health: 100.0,
                damage: 10.0,
                radius: 0.5,
                threat: 1.0,
            },
            Archetype::Fast => ArchetypeProfile {
                speed: 7.0,
                max_health: 60.0,
                damage: 8.0,
                radius: 0.4,
                threat: 1.5,
            },
            Archetype::Tank => ArchetypeProfile {
                speed: 2.5,
                max_health: 300.0,
                damage: 25.0,
                radius: 0.9,
                threat: 3.0,
            },
            Archetype::Boss => ArchetypeProfile {
                speed: 3.0,
                max_health: 1000.0,
                damage: 40.0,
                radius: 1.5,
                threat: 8.0,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Archetype::Normal => "normal",
            Archetype::Fast => "fast",
            Archetype::Tank => "tank",
            Archetype::Boss => "boss",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Speed, durability and damage for an archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeProfile {
    /// Base movement speed in units per second
    pub speed: f32,
    pub max_health: f32,
    /// Damage dealt per attack
    pub damage: f32,
    /// Collision radius used by peers for personal space
    pub radius: f32,
    /// Relative danger used for spawn threat estimates
    pub threat: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_are_distinct() {
        let normal = Archetype::Normal.profile();
        let fast = Archetype::Fast.profile();
        let tank = Archetype::Tank.profile();
        let boss = Archetype::Boss.profile();

        assert!(fast.speed > normal.speed);
        assert!(tank.max_health > normal.max_health);
        assert!(tank.speed < normal.speed);
        assert!(boss.max_health > tank.max_health);
        assert!(boss.threat > tank.threat);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, archetype) in Archetype::ALL.iter().enumerate() {
            assert_eq!(archetype.index(), i);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Archetype::Tank).unwrap();
        assert_eq!(json, "\"tank\"");
    }
}

//! Money, upgrades and distance records carried between rounds

use serde::{Deserialize, Serialize};

use crate::sim::{RoundOutcome, UpgradeStats};

/// Distance records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStats {
    pub best_distance: i32,
    /// Distance of the most recent round
    pub current_distance: i32,
    /// Highest level unlocked
    pub max_level: u32,
}

impl Default for GameStats {
    fn default() -> Self {
        Self {
            best_distance: 0,
            current_distance: 0,
            max_level: 1,
        }
    }
}

/// Everything the player keeps between rounds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Progression {
    pub upgrades: UpgradeStats,
    pub stats: GameStats,
}

impl Progression {
    /// Fold a round result into the player's progress.
    ///
    /// Call once per outcome. Returns true when the distance is a new
    /// personal best.
    pub fn apply_outcome(&mut self, outcome: &RoundOutcome, level: u32) -> bool {
        self.upgrades.money = self.upgrades.money.saturating_add(outcome.money_earned);
        self.stats.current_distance = outcome.final_distance;

        let new_best = outcome.final_distance > self.stats.best_distance;
        if new_best {
            self.stats.best_distance = outcome.final_distance;
            log::info!("New best distance: {}", outcome.final_distance);
        }
        if outcome.level_cleared {
            self.stats.max_level = self.stats.max_level.max(level.saturating_add(1));
        }
        new_best
    }

    /// Repair values that could not come out of normal play
    pub fn sanitized(mut self) -> Self {
        self.upgrades = self.upgrades.clamped();
        self.stats.max_level = self.stats.max_level.max(1);
        self.stats.best_distance = self.stats.best_distance.max(0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landed(distance: i32, money: u64) -> RoundOutcome {
        RoundOutcome {
            money_earned: money,
            final_distance: distance,
            damage_dealt: 0,
            level_cleared: false,
        }
    }

    #[test]
    fn test_money_and_best_distance() {
        let mut p = Progression::default();
        assert!(p.apply_outcome(&landed(250, 50), 1));
        assert!(!p.apply_outcome(&landed(100, 20), 1));
        assert_eq!(p.upgrades.money, 70);
        assert_eq!(p.stats.best_distance, 250);
        assert_eq!(p.stats.current_distance, 100);
        assert_eq!(p.stats.max_level, 1);
    }

    #[test]
    fn test_clear_unlocks_next_level() {
        let mut p = Progression::default();
        let cleared = RoundOutcome {
            money_earned: 580,
            final_distance: 380,
            damage_dealt: 40,
            level_cleared: true,
        };
        p.apply_outcome(&cleared, 3);
        assert_eq!(p.stats.max_level, 4);
        // Replaying an earlier level never lowers it
        p.apply_outcome(&cleared, 1);
        assert_eq!(p.stats.max_level, 4);
    }

    #[test]
    fn test_negative_distance_is_not_a_best() {
        let mut p = Progression::default();
        assert!(!p.apply_outcome(&landed(-30, 0), 1));
        assert_eq!(p.stats.best_distance, 0);
        assert_eq!(p.stats.current_distance, -30);
    }
}

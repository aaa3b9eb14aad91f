//! Round results and the once-per-round reporting latch

use serde::{Deserialize, Serialize};

use super::config::PhysicsConfig;

/// Final result of one firing episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub money_earned: u64,
    /// Whole pixels from the cannon; negative if the shot rebounded behind it
    pub final_distance: i32,
    pub damage_dealt: u32,
    pub level_cleared: bool,
}

/// Whole-pixel distance travelled from the cannon
#[inline]
pub fn distance_from_cannon(x: f32, config: &PhysicsConfig) -> i32 {
    (x - config.cannon_x).floor() as i32
}

/// Outcome for a shot that came to rest without destroying the target
pub fn landing_outcome(final_x: f32, config: &PhysicsConfig) -> RoundOutcome {
    let final_distance = distance_from_cannon(final_x, config);
    let coins = final_distance.div_euclid(config.distance_per_coin.max(1)).max(0);
    RoundOutcome {
        money_earned: coins as u64,
        final_distance,
        damage_dealt: 0,
        level_cleared: false,
    }
}

/// Outcome for the hit that destroyed the target
pub fn clear_outcome(final_x: f32, last_damage: u32, config: &PhysicsConfig) -> RoundOutcome {
    RoundOutcome {
        money_earned: 2 * last_damage as u64 + config.clear_bonus,
        final_distance: distance_from_cannon(final_x, config),
        damage_dealt: last_damage,
        level_cleared: true,
    }
}

/// Lets exactly one outcome through per armed round
#[derive(Debug, Clone, Default)]
pub struct RoundReporter {
    armed: bool,
}

impl RoundReporter {
    /// Open the latch for a new firing episode
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Pass the outcome through if this round has not reported yet
    pub fn report(&mut self, outcome: RoundOutcome) -> Option<RoundOutcome> {
        if !self.armed {
            log::warn!("Dropping outcome for a round that already reported: {:?}", outcome);
            return None;
        }
        self.armed = false;
        log::info!(
            "Round finished: distance={} money={} damage={} cleared={}",
            outcome.final_distance,
            outcome.money_earned,
            outcome.damage_dealt,
            outcome.level_cleared
        );
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_outcome() {
        let config = PhysicsConfig::default();
        let o = landing_outcome(config.cannon_x + 523.7, &config);
        assert_eq!(o.final_distance, 523);
        assert_eq!(o.money_earned, 104);
        assert_eq!(o.damage_dealt, 0);
        assert!(!o.level_cleared);
    }

    #[test]
    fn test_landing_behind_cannon_earns_nothing() {
        let config = PhysicsConfig::default();
        let o = landing_outcome(config.cannon_x - 12.5, &config);
        assert_eq!(o.final_distance, -13);
        assert_eq!(o.money_earned, 0);
    }

    #[test]
    fn test_clear_outcome() {
        let config = PhysicsConfig::default();
        let o = clear_outcome(config.cannon_x + 300.2, 212, &config);
        assert_eq!(o.final_distance, 300);
        assert_eq!(o.money_earned, 2 * 212 + 500);
        assert_eq!(o.damage_dealt, 212);
        assert!(o.level_cleared);
    }

    #[test]
    fn test_reporter_latches() {
        let config = PhysicsConfig::default();
        let mut reporter = RoundReporter::default();
        let o = landing_outcome(500.0, &config);

        assert!(reporter.report(o).is_none(), "unarmed reporter must stay silent");
        reporter.arm();
        assert_eq!(reporter.report(o), Some(o));
        assert!(reporter.report(o).is_none());
    }
}

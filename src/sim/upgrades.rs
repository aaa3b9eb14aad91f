//! Upgrade parameters the shop sells and the simulation reads

use serde::{Deserialize, Serialize};

use super::config::PhysicsConfig;
use crate::consts::*;

/// Purchased cannon stats plus the wallet they are paid from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeStats {
    /// Launch power at full pull, before the power multiplier
    pub max_power: f32,
    /// Points of drag reduction
    pub aerodynamics: f32,
    /// Fraction of vertical speed kept on a ground bounce
    pub bounciness: f32,
    /// Currency balance
    pub money: u64,
}

impl Default for UpgradeStats {
    fn default() -> Self {
        Self {
            max_power: MAX_POWER_BASE,
            aerodynamics: 0.0,
            bounciness: BOUNCINESS_DEFAULT,
            money: 0,
        }
    }
}

impl UpgradeStats {
    /// Copy with every stat forced into its documented range
    pub fn clamped(self) -> Self {
        Self {
            max_power: clamp_or(self.max_power, MAX_POWER_BASE, MAX_POWER_CAP),
            aerodynamics: clamp_or(self.aerodynamics, 0.0, AERODYNAMICS_CAP),
            bounciness: clamp_or(self.bounciness, 0.0, BOUNCINESS_CAP),
            money: self.money,
        }
    }

    /// Per-step velocity retention with the aerodynamics bonus applied
    #[inline]
    pub fn air_resistance(&self, config: &PhysicsConfig) -> f32 {
        config.air_resistance_base + self.aerodynamics * config.aero_bonus_per_point
    }
}

/// Clamp, mapping NaN to the lower bound
fn clamp_or(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_ranges() {
        let wild = UpgradeStats {
            max_power: 99.0,
            aerodynamics: -3.0,
            bounciness: 1.5,
            money: 7,
        };
        let c = wild.clamped();
        assert_eq!(c.max_power, MAX_POWER_CAP);
        assert_eq!(c.aerodynamics, 0.0);
        assert_eq!(c.bounciness, BOUNCINESS_CAP);
        assert_eq!(c.money, 7);

        let nan = UpgradeStats {
            bounciness: f32::NAN,
            ..Default::default()
        };
        assert_eq!(nan.clamped().bounciness, 0.0);
    }

    #[test]
    fn test_air_resistance_bonus() {
        let config = PhysicsConfig::default();
        let base = UpgradeStats::default();
        assert!((base.air_resistance(&config) - 0.99).abs() < 1e-6);

        let tuned = UpgradeStats {
            aerodynamics: 5.0,
            ..base
        };
        assert!((tuned.air_resistance(&config) - 0.995).abs() < 1e-6);
    }
}

//! Physics and layout constants as an injectable record
//!
//! Every tunable the simulation reads lives here. `GameState` receives one at
//! construction and never mutates it, so tests can override any constant.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Immutable simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub air_resistance_base: f32,
    pub aero_bonus_per_point: f32,
    pub ground_friction: f32,
    pub rolling_friction: f32,
    pub bounce_threshold: f32,
    pub rest_speed: f32,
    pub spin_factor: f32,

    pub cannon_x: f32,
    /// Height of the ground band measured from the bottom of the viewport
    pub ground_height: f32,
    /// Muzzle height above the ground line
    pub muzzle_height: f32,
    pub projectile_radius: f32,

    pub max_pull: f32,
    pub min_pull: f32,
    pub power_multiplier: f32,

    pub camera_lead: f32,
    pub camera_smoothing: f32,

    pub castle_start_dist: f32,
    pub castle_dist_increment: f32,
    pub castle_base_health: u32,
    pub castle_health_increment: u32,
    pub castle_width: f32,
    pub castle_height: f32,

    pub damage_per_speed: f32,
    pub base_damage: u32,
    pub target_rebound: f32,

    pub distance_per_coin: i32,
    pub clear_bonus: u64,

    pub particle_gravity: f32,
    pub particle_decay: f32,
    pub preview_steps: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            air_resistance_base: AIR_RESISTANCE_BASE,
            aero_bonus_per_point: AERO_BONUS_PER_POINT,
            ground_friction: GROUND_FRICTION,
            rolling_friction: ROLLING_FRICTION,
            bounce_threshold: BOUNCE_THRESHOLD,
            rest_speed: REST_SPEED,
            spin_factor: SPIN_FACTOR,

            cannon_x: CANNON_X,
            ground_height: GROUND_HEIGHT,
            muzzle_height: MUZZLE_HEIGHT,
            projectile_radius: PROJECTILE_RADIUS,

            max_pull: MAX_PULL,
            min_pull: MIN_PULL,
            power_multiplier: POWER_MULTIPLIER,

            camera_lead: CAMERA_LEAD,
            camera_smoothing: CAMERA_SMOOTHING,

            castle_start_dist: CASTLE_START_DIST,
            castle_dist_increment: CASTLE_DIST_INCREMENT,
            castle_base_health: CASTLE_BASE_HEALTH,
            castle_health_increment: CASTLE_HEALTH_INCREMENT,
            castle_width: CASTLE_WIDTH,
            castle_height: CASTLE_HEIGHT,

            damage_per_speed: DAMAGE_PER_SPEED,
            base_damage: BASE_DAMAGE,
            target_rebound: TARGET_REBOUND,

            distance_per_coin: DISTANCE_PER_COIN,
            clear_bonus: CLEAR_BONUS,

            particle_gravity: PARTICLE_GRAVITY,
            particle_decay: PARTICLE_DECAY,
            preview_steps: PREVIEW_STEPS,
        }
    }
}

impl PhysicsConfig {
    /// Ground line in screen space for a viewport of the given height
    #[inline]
    pub fn ground_y(&self, viewport_height: f32) -> f32 {
        viewport_height - self.ground_height
    }

    /// Projectile spawn point for a viewport of the given height
    #[inline]
    pub fn muzzle(&self, viewport_height: f32) -> glam::Vec2 {
        glam::Vec2::new(self.cannon_x, self.ground_y(viewport_height) - self.muzzle_height)
    }

    /// Parse a config from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PhysicsConfig::from_json(r#"{ "gravity": 0.5 }"#).unwrap();
        assert_eq!(config.gravity, 0.5);
        assert_eq!(config.air_resistance_base, AIR_RESISTANCE_BASE);
        assert_eq!(config.castle_base_health, CASTLE_BASE_HEALTH);
    }

    #[test]
    fn test_muzzle_sits_above_ground() {
        let config = PhysicsConfig::default();
        let muzzle = config.muzzle(720.0);
        assert_eq!(muzzle.x, CANNON_X);
        assert_eq!(muzzle.y, 720.0 - GROUND_HEIGHT - MUZZLE_HEIGHT);
    }
}

//! Collision detection and response against the ground and the castle
//!
//! Each resolver mutates only the projectile (and, for the castle, its
//! health) and returns what happened so the frame driver can emit particles,
//! audio cues and outcomes.

use glam::Vec2;

use super::config::PhysicsConfig;
use super::state::{Castle, Projectile};

/// What a ground check did this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundContact {
    /// Not touching the ground
    Airborne,
    /// Hard landing that reflected the projectile upward
    Bounce {
        /// Vertical speed before the bounce
        impact_speed: f32,
    },
    /// Touching the ground and rolling
    Rolling,
    /// Rolled to a stop this frame
    Settled,
}

/// Result of a castle hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetHit {
    pub damage: u32,
    /// Projectile position at impact (before the separation nudge)
    pub point: Vec2,
    pub destroyed: bool,
}

/// Circle vs box test done by inflating the box by the circle radius
#[inline]
pub fn overlaps_target(pos: Vec2, radius: f32, castle: &Castle) -> bool {
    let min = castle.pos;
    let max = castle.pos + castle.size;
    pos.x + radius > min.x && pos.x - radius < max.x && pos.y + radius > min.y && pos.y - radius < max.y
}

/// Damage for a hit at velocity `vel`
#[inline]
pub fn impact_damage(vel: Vec2, config: &PhysicsConfig) -> u32 {
    let raw = (vel.x.abs() * config.damage_per_speed + vel.y.abs() * config.damage_per_speed).floor();
    raw.max(0.0) as u32 + config.base_damage
}

/// Check and resolve a castle hit.
///
/// Destroyed castles and resting projectiles are never tested. On a hit the
/// velocity is reversed and scaled by the rebound factor, and the projectile is
/// pushed two steps along its new velocity so it does not re-enter the box on
/// the next frame. A destroying hit stops the projectile.
pub fn resolve_target(
    projectile: &mut Projectile,
    castle: &mut Castle,
    config: &PhysicsConfig,
) -> Option<TargetHit> {
    if castle.is_destroyed() || projectile.at_rest {
        return None;
    }
    if !overlaps_target(projectile.pos, config.projectile_radius, castle) {
        return None;
    }

    let damage = impact_damage(projectile.vel, config);
    castle.current_health = castle.current_health.saturating_sub(damage);
    let point = projectile.pos;

    projectile.vel = -projectile.vel * config.target_rebound;
    projectile.pos += projectile.vel * 2.0;

    let destroyed = castle.is_destroyed();
    if destroyed {
        projectile.halt();
    }
    log::debug!(
        "Castle hit for {} ({} / {} left)",
        damage,
        castle.current_health,
        castle.max_health
    );

    Some(TargetHit {
        damage,
        point,
        destroyed,
    })
}

/// Check and resolve ground contact for a projectile in flight
pub fn resolve_ground(
    projectile: &mut Projectile,
    ground_y: f32,
    bounciness: f32,
    config: &PhysicsConfig,
) -> GroundContact {
    if projectile.at_rest || projectile.pos.y + config.projectile_radius < ground_y {
        return GroundContact::Airborne;
    }

    projectile.pos.y = ground_y - config.projectile_radius;

    let impact_speed = projectile.vel.y.abs();
    if impact_speed > config.bounce_threshold {
        projectile.vel.y = -projectile.vel.y * bounciness;
        projectile.vel.x *= config.ground_friction;
        return GroundContact::Bounce { impact_speed };
    }

    projectile.vel.y = 0.0;
    projectile.vel.x *= config.rolling_friction;
    if projectile.vel.x.abs() < config.rest_speed {
        projectile.at_rest = true;
        return GroundContact::Settled;
    }
    GroundContact::Rolling
}

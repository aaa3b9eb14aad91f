//! Projectile kinematics
//!
//! Integration of the single projectile and the mapping from a drag gesture to
//! a launch velocity. Nothing here fails: inputs are pre-clamped, and a
//! non-finite projectile is a caller bug.

use glam::Vec2;
use serde::Serialize;

use super::config::PhysicsConfig;
use super::state::Projectile;

/// Launch parameters derived from a drag
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaunchSolution {
    /// Raw drag length
    pub pull: f32,
    /// Clamped pull mapped into [0, 1]
    pub power_ratio: f32,
    /// Speed at launch
    pub power: f32,
    /// Drag direction (radians)
    pub angle: f32,
    pub velocity: Vec2,
}

/// Advance one logical step of `dt` frames.
///
/// Gravity is applied before damping, and damping before the position update,
/// so a single step from rest already moves the projectile downward.
pub fn integrate(projectile: &mut Projectile, dt: f32, air_resistance: f32, config: &PhysicsConfig) {
    projectile.vel.y += config.gravity * dt;
    projectile.vel *= air_resistance.powf(dt);
    projectile.pos += projectile.vel * dt;
    projectile.rotation += projectile.vel.x * config.spin_factor * dt;
}

/// Vector from the current pointer back to the drag anchor
#[inline]
pub fn pull_vector(anchor: Vec2, current: Vec2) -> Vec2 {
    anchor - current
}

/// Launch solution for a drag, ignoring the cancel threshold
pub fn aim(anchor: Vec2, current: Vec2, max_power: f32, config: &PhysicsConfig) -> LaunchSolution {
    let d = pull_vector(anchor, current);
    let pull = d.length();
    let power_ratio = if config.max_pull > 0.0 {
        pull.min(config.max_pull) / config.max_pull
    } else {
        0.0
    };
    let power = power_ratio * max_power * config.power_multiplier;
    let angle = d.y.atan2(d.x);
    LaunchSolution {
        pull,
        power_ratio,
        power,
        angle,
        velocity: Vec2::new(angle.cos() * power, -angle.sin() * power),
    }
}

/// Launch solution for a released drag, or `None` if the pull was too short
/// to count as a shot
pub fn solve_launch(
    anchor: Vec2,
    current: Vec2,
    max_power: f32,
    config: &PhysicsConfig,
) -> Option<LaunchSolution> {
    let solution = aim(anchor, current, max_power, config);
    if solution.pull < config.min_pull {
        return None;
    }
    Some(solution)
}

/// Barrel angle for drawing, clamped to [0, π/2]; 45° without a drag
pub fn barrel_angle(anchor: Vec2, current: Vec2) -> f32 {
    let d = pull_vector(anchor, current);
    if d == Vec2::ZERO {
        return std::f32::consts::FRAC_PI_4;
    }
    d.y.atan2(d.x).clamp(0.0, std::f32::consts::FRAC_PI_2)
}

/// Dotted aiming arc: gravity-only steps from the muzzle
pub fn trajectory_preview(muzzle: Vec2, solution: &LaunchSolution, config: &PhysicsConfig) -> Vec<Vec2> {
    let mut pos = muzzle;
    let mut vel = solution.velocity;
    (0..config.preview_steps)
        .map(|_| {
            pos += vel;
            vel.y += config.gravity;
            pos
        })
        .collect()
}

//! Castle Cannon - drag-to-fire artillery game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, camera, game modes)
//! - `session`: Wires the simulation to progression, shop and leaderboard
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Versioned save envelope
//! - `shop` / `progression` / `leaderboard`: Between-round collaborators

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod progression;
pub mod session;
pub mod settings;
pub mod shop;
pub mod sim;

pub use leaderboard::Leaderboard;
pub use progression::{GameStats, Progression};
pub use session::Session;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// Units are screen pixels and logical frames; one frame is one physics step.
pub mod consts {
    /// Logical timestep handed to the integrator every frame
    pub const LOGICAL_DT: f32 = 1.0;

    /// Downward acceleration per step
    pub const GRAVITY: f32 = 0.25;
    /// Base velocity retention per step before upgrades
    pub const AIR_RESISTANCE_BASE: f32 = 0.99;
    /// Retention bonus per aerodynamics point
    pub const AERO_BONUS_PER_POINT: f32 = 0.001;
    /// Horizontal damping applied on a hard ground bounce
    pub const GROUND_FRICTION: f32 = 0.8;
    /// Horizontal damping per frame while rolling
    pub const ROLLING_FRICTION: f32 = 0.95;
    /// Vertical speed above which a ground contact bounces
    pub const BOUNCE_THRESHOLD: f32 = 1.0;
    /// Horizontal speed below which a rolling projectile is at rest
    pub const REST_SPEED: f32 = 0.1;
    /// Rotation per unit of horizontal velocity (cosmetic)
    pub const SPIN_FACTOR: f32 = 0.1;

    /// Cannon layout
    pub const CANNON_X: f32 = 100.0;
    pub const GROUND_HEIGHT: f32 = 120.0;
    pub const MUZZLE_HEIGHT: f32 = 20.0;
    pub const PROJECTILE_RADIUS: f32 = 10.0;

    /// Drag gesture mapping
    pub const MAX_PULL: f32 = 200.0;
    pub const MIN_PULL: f32 = 20.0;
    pub const POWER_MULTIPLIER: f32 = 1.5;

    /// Upgrade ranges
    pub const MAX_POWER_BASE: f32 = 15.0;
    pub const MAX_POWER_CAP: f32 = 40.0;
    pub const AERODYNAMICS_CAP: f32 = 5.0;
    pub const BOUNCINESS_DEFAULT: f32 = 0.3;
    pub const BOUNCINESS_CAP: f32 = 0.9;

    /// Camera
    pub const CAMERA_LEAD: f32 = 0.3;
    pub const CAMERA_SMOOTHING: f32 = 0.1;

    /// Castle layout per level
    pub const CASTLE_START_DIST: f32 = 400.0;
    pub const CASTLE_DIST_INCREMENT: f32 = 300.0;
    pub const CASTLE_BASE_HEALTH: u32 = 50;
    pub const CASTLE_HEALTH_INCREMENT: u32 = 30;
    pub const CASTLE_WIDTH: f32 = 120.0;
    pub const CASTLE_HEIGHT: f32 = 150.0;

    /// Castle hits
    pub const DAMAGE_PER_SPEED: f32 = 10.0;
    pub const BASE_DAMAGE: u32 = 10;
    pub const TARGET_REBOUND: f32 = 0.5;

    /// Payouts
    pub const DISTANCE_PER_COIN: i32 = 5;
    pub const CLEAR_BONUS: u64 = 500;

    /// Particle motion
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    pub const PARTICLE_DECAY: f32 = 0.02;

    /// Aiming preview
    pub const PREVIEW_STEPS: usize = 15;
}

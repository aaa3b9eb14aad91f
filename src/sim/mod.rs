//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One logical step per frame
//! - Seeded RNG only (and only for particles)
//! - No rendering, storage or platform dependencies

pub mod camera;
pub mod collision;
pub mod config;
pub mod cues;
pub mod kinematics;
pub mod mode;
pub mod outcome;
pub mod particles;
pub mod state;
pub mod tick;
pub mod upgrades;

pub use camera::Camera;
pub use collision::{GroundContact, TargetHit, resolve_ground, resolve_target};
pub use config::PhysicsConfig;
pub use cues::{AudioSink, CueCounter, Silent};
pub use kinematics::{LaunchSolution, integrate, solve_launch};
pub use mode::{GameMode, ModeEvent};
pub use outcome::{RoundOutcome, RoundReporter};
pub use particles::{Particle, ParticlePool};
pub use state::{AimPreview, Castle, DragGesture, GameState, Projectile, RenderSnapshot};
pub use tick::{Screen, TickInput, tick};
pub use upgrades::UpgradeStats;

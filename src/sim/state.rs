//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything that changes frame to frame.
//! Presentation reads it through `snapshot`; input and session code go through
//! the narrow mutators on `GameState` and `TickInput`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::config::PhysicsConfig;
use super::kinematics::{self, LaunchSolution};
use super::mode::{GameMode, ModeEvent};
use super::outcome::RoundReporter;
use super::particles::{Particle, ParticlePool};

/// The single active projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Cosmetic spin, never read by physics
    pub rotation: f32,
    pub at_rest: bool,
}

impl Projectile {
    /// Projectile parked at the muzzle
    pub fn at_muzzle(muzzle: Vec2) -> Self {
        Self {
            pos: muzzle,
            vel: Vec2::ZERO,
            rotation: 0.0,
            at_rest: true,
        }
    }

    /// Stop dead where it is
    pub fn halt(&mut self) {
        self.vel = Vec2::ZERO;
        self.at_rest = true;
    }
}

/// The castle a level asks the player to destroy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Castle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub max_health: u32,
    pub current_health: u32,
    pub level: u32,
}

impl Castle {
    /// Layout for a level, standing on the ground line
    pub fn for_level(level: u32, ground_y: f32, config: &PhysicsConfig) -> Self {
        let level = level.max(1);
        let steps = level - 1;
        let x = config.castle_start_dist + steps as f32 * config.castle_dist_increment;
        let health = Self::health_for_level(level, config);
        Self {
            pos: Vec2::new(x, ground_y - config.castle_height),
            size: Vec2::new(config.castle_width, config.castle_height),
            max_health: health,
            current_health: health,
            level,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.current_health == 0
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Keep the castle standing on the ground after a resize
    pub fn settle_on(&mut self, ground_y: f32) {
        self.pos.y = ground_y - self.size.y;
    }

    /// Full health of a level's castle; saturates for absurd levels
    pub fn health_for_level(level: u32, config: &PhysicsConfig) -> u32 {
        let steps = level.max(1) - 1;
        config
            .castle_base_health
            .saturating_add(steps.saturating_mul(config.castle_health_increment))
    }

    /// True when this castle is what `for_level(level)` would build
    pub fn is_consistent_with(&self, level: u32, config: &PhysicsConfig) -> bool {
        self.level == level.max(1)
            && self.max_health == Self::health_for_level(level, config)
            && self.current_health <= self.max_health
    }
}

/// In-progress drag, written only by input handling
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DragGesture {
    pub anchor: Option<Vec2>,
    pub current: Option<Vec2>,
}

impl DragGesture {
    pub fn begin(&mut self, at: Vec2) {
        self.anchor = Some(at);
        self.current = Some(at);
    }

    pub fn clear(&mut self) {
        self.anchor = None;
        self.current = None;
    }

    /// Both ends of the drag, if one is in progress
    pub fn ends(&self) -> Option<(Vec2, Vec2)> {
        Some((self.anchor?, self.current?))
    }
}

/// Aiming feedback while a drag is in progress
#[derive(Debug, Clone, Serialize)]
pub struct AimPreview {
    /// Barrel angle in [0, π/2]
    pub barrel_angle: f32,
    /// Pull fraction in [0, 1]
    pub power_ratio: f32,
    /// Would releasing now launch
    pub armed: bool,
    pub points: Vec<Vec2>,
}

/// Read-only view handed to presentation once per frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot<'a> {
    pub mode: GameMode,
    pub level: u32,
    pub viewport: Vec2,
    pub ground_y: f32,
    pub muzzle: Vec2,
    pub camera: Camera,
    pub projectile: &'a Projectile,
    pub target: Option<&'a Castle>,
    pub particles: &'a [Particle],
    pub distance: i32,
    pub aim: Option<AimPreview>,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: PhysicsConfig,
    pub mode: GameMode,
    /// Screen size in pixels
    pub viewport: Vec2,
    /// Active level (1-based)
    pub level: u32,
    pub projectile: Projectile,
    pub target: Option<Castle>,
    pub camera: Camera,
    pub particles: ParticlePool,
    pub drag: DragGesture,
    /// Distance readout for the current shot
    pub distance: i32,
    /// Damage of the most recent castle hit this round
    pub last_damage: u32,
    /// Frames simulated
    pub time_ticks: u64,
    pub(crate) reporter: RoundReporter,
}

impl GameState {
    /// New state at level 1 with a castle target
    pub fn new(seed: u64, viewport: Vec2) -> Self {
        Self::with_config(seed, viewport, PhysicsConfig::default())
    }

    pub fn with_config(seed: u64, viewport: Vec2, config: PhysicsConfig) -> Self {
        let mut state = Self::without_target(seed, viewport, config);
        state.reset_for_level(1);
        state
    }

    /// Free-flight state: shots only ever end by landing
    pub fn without_target(seed: u64, viewport: Vec2, config: PhysicsConfig) -> Self {
        let muzzle = config.muzzle(viewport.y);
        Self {
            mode: GameMode::Menu,
            viewport,
            level: 1,
            projectile: Projectile::at_muzzle(muzzle),
            target: None,
            camera: Camera::default(),
            particles: ParticlePool::new(seed),
            drag: DragGesture::default(),
            distance: 0,
            last_damage: 0,
            time_ticks: 0,
            reporter: RoundReporter::default(),
            config,
        }
    }

    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.config.ground_y(self.viewport.y)
    }

    #[inline]
    pub fn muzzle(&self) -> Vec2 {
        self.config.muzzle(self.viewport.y)
    }

    /// Rebuild the castle for `level`. Calling it twice with the same level
    /// yields the same castle.
    pub fn reset_for_level(&mut self, level: u32) {
        let level = level.max(1);
        if self.level != level {
            log::info!("Level {} -> {}", self.level, level);
        }
        self.level = level;
        self.target = Some(Castle::for_level(level, self.ground_y(), &self.config));
    }

    /// Rebuild the castle if it no longer matches the active level, or if a
    /// destroyed castle is still standing once play is back at the cannon
    pub fn heal_target(&mut self) {
        let level = self.level;
        let Some(castle) = &self.target else {
            return;
        };
        if !castle.is_consistent_with(level, &self.config) {
            log::warn!("Castle out of sync with level {}, rebuilding", level);
            self.reset_for_level(level);
        } else if castle.is_destroyed() && self.mode.holds_at_muzzle() {
            log::info!("Rebuilding castle for another go at level {}", level);
            self.reset_for_level(level);
        }
    }

    /// Resize the viewport, keeping the castle grounded
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        let ground_y = self.ground_y();
        if let Some(castle) = &mut self.target {
            castle.settle_on(ground_y);
        }
        if self.mode.holds_at_muzzle() {
            self.projectile = Projectile::at_muzzle(self.muzzle());
        }
    }

    /// Clear everything that lives for one round only
    pub fn reset_round(&mut self) {
        self.projectile = Projectile::at_muzzle(self.muzzle());
        self.camera.reset();
        self.particles.clear();
        self.distance = 0;
        self.last_damage = 0;
    }

    /// Seed the projectile from a launch solution at the muzzle
    pub fn seed_launch(&mut self, solution: &LaunchSolution) {
        self.reset_round();
        self.projectile.vel = solution.velocity;
        self.projectile.at_rest = false;
        self.reporter.arm();
    }

    /// Apply a mode event; returns whether the mode changed
    pub fn transition(&mut self, event: ModeEvent) -> bool {
        match self.mode.on(event) {
            Some(next) => {
                log::debug!("Mode {:?} --{:?}--> {:?}", self.mode, event, next);
                self.mode = next;
                true
            }
            None => false,
        }
    }

    /// Aiming feedback for the drag in progress
    pub fn aim_preview(&self, max_power: f32) -> Option<AimPreview> {
        if self.mode != GameMode::Aiming {
            return None;
        }
        let (anchor, current) = self.drag.ends()?;
        let solution = kinematics::aim(anchor, current, max_power, &self.config);
        Some(AimPreview {
            barrel_angle: kinematics::barrel_angle(anchor, current),
            power_ratio: solution.power_ratio,
            armed: solution.pull >= self.config.min_pull,
            points: kinematics::trajectory_preview(self.muzzle(), &solution, &self.config),
        })
    }

    /// Read-only view for presentation
    pub fn snapshot(&self, max_power: f32) -> RenderSnapshot<'_> {
        RenderSnapshot {
            mode: self.mode,
            level: self.level,
            viewport: self.viewport,
            ground_y: self.ground_y(),
            muzzle: self.muzzle(),
            camera: self.camera,
            projectile: &self.projectile,
            target: self.target.as_ref(),
            particles: self.particles.particles(),
            distance: self.distance,
            aim: self.aim_preview(max_power),
        }
    }
}

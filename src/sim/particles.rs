//! Visual feedback particles
//!
//! Particles never feed back into gameplay. Spray directions come from a
//! seeded PCG stream so replays stay identical.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::PhysicsConfig;

/// Particle colors (0xRRGGBB)
pub mod colors {
    pub const MUZZLE: u32 = 0xfcd34d;
    pub const BOUNCE: u32 = 0xfbbf24;
    pub const CASTLE_BODY: u32 = 0x334155;
    pub const CASTLE_ACCENT: u32 = 0xef4444;
    pub const SPARK: u32 = 0xffffff;
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, removed once it reaches zero
    pub life: f32,
    pub size: f32,
    pub color: u32,
}

/// Default particle cap
pub const MAX_PARTICLES: usize = 500;

/// Owns every live particle
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    rng: Pcg32,
    cap: usize,
}

impl ParticlePool {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            cap: MAX_PARTICLES,
        }
    }

    /// Limit live particles; extra bursts are dropped, existing ones are kept
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        self.particles.truncate(cap);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Radial burst of `count` particles from `pos`
    pub fn burst(&mut self, pos: Vec2, color: u32, count: usize) {
        for _ in 0..count {
            if self.particles.len() >= self.cap {
                break;
            }
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            let speed = self.rng.random::<f32>() * 5.0 + 2.0;
            let size = self.rng.random::<f32>() * 4.0 + 2.0;
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                size,
                color,
            });
        }
    }

    /// Advance one frame and drop expired particles
    pub fn age(&mut self, config: &PhysicsConfig) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel.y += config.particle_gravity;
            p.life -= config.particle_decay;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

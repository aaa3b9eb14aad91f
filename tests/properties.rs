//! Invariants checked over generated inputs

use castle_cannon::sim::collision::resolve_ground;
use castle_cannon::sim::kinematics::aim;
use castle_cannon::sim::{GameMode, GameState, PhysicsConfig, Projectile, Silent, TickInput, UpgradeStats, tick};
use glam::Vec2;
use proptest::prelude::*;

fn viewport() -> Vec2 {
    Vec2::new(1280.0, 720.0)
}

fn drag(state: &mut GameState, anchor: Vec2, current: Vec2, upgrades: &UpgradeStats) {
    let start = TickInput {
        drag_start: Some(anchor),
        ..Default::default()
    };
    tick(state, &start, upgrades, &mut Silent);
    let end = TickInput {
        drag_move: Some(current),
        drag_end: true,
        ..Default::default()
    };
    tick(state, &end, upgrades, &mut Silent);
}

proptest! {
    #[test]
    fn short_pull_never_launches(
        ax in 0.0f32..1200.0,
        ay in 0.0f32..600.0,
        angle in 0.0f32..std::f32::consts::TAU,
        len in 0.0f32..19.9,
    ) {
        let mut state = GameState::new(1, viewport());
        let upgrades = UpgradeStats::default();
        let before = state.projectile;
        let anchor = Vec2::new(ax, ay);
        let current = anchor + Vec2::new(angle.cos(), angle.sin()) * len;

        drag(&mut state, anchor, current, &upgrades);

        prop_assert_eq!(state.mode, GameMode::Menu);
        prop_assert_eq!(state.projectile, before);
        prop_assert_eq!(state.projectile.vel, Vec2::ZERO);
    }

    #[test]
    fn power_monotonic_and_saturating(
        a in 0.0f32..400.0,
        b in 0.0f32..400.0,
        max_power in 15.0f32..40.0,
    ) {
        let config = PhysicsConfig::default();
        let anchor = Vec2::new(500.0, 300.0);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let p_lo = aim(anchor, anchor - Vec2::new(lo, 0.0), max_power, &config).power;
        let p_hi = aim(anchor, anchor - Vec2::new(hi, 0.0), max_power, &config).power;

        prop_assert!(p_lo <= p_hi);
        prop_assert!(p_hi <= max_power * 1.5 + 1e-4);
        if hi >= 200.0 {
            prop_assert!((p_hi - max_power * 1.5).abs() < 1e-4);
        }
    }

    #[test]
    fn bounce_never_adds_energy(
        vx in -30.0f32..30.0,
        vy in 0.0f32..40.0,
        bounciness in 0.0f32..=0.9,
        depth in 0.0f32..15.0,
    ) {
        let config = PhysicsConfig::default();
        let ground_y = 600.0;
        let mut projectile = Projectile {
            pos: Vec2::new(300.0, ground_y - config.projectile_radius + depth),
            vel: Vec2::new(vx, vy),
            rotation: 0.0,
            at_rest: false,
        };

        resolve_ground(&mut projectile, ground_y, bounciness, &config);

        prop_assert!(projectile.vel.y.abs() <= bounciness * vy.abs() + 1e-5);
        prop_assert!(projectile.vel.x.abs() <= vx.abs());
        prop_assert_eq!(projectile.pos.y, ground_y - config.projectile_radius);
    }

    #[test]
    fn castle_health_only_goes_down(
        level in 1u32..5,
        angle_deg in 0.0f32..80.0,
        pull in 20.0f32..260.0,
        max_power in 15.0f32..40.0,
    ) {
        let mut state = GameState::new(3, viewport());
        state.reset_for_level(level);
        let upgrades = UpgradeStats { max_power, ..Default::default() };
        let anchor = Vec2::new(600.0, 300.0);
        let angle = angle_deg.to_radians();
        drag(&mut state, anchor, anchor - Vec2::new(angle.cos(), angle.sin()) * pull, &upgrades);

        let max_health = state.target.as_ref().unwrap().max_health;
        let mut last = max_health;
        let mut reports = 0;
        for _ in 0..3000 {
            if tick(&mut state, &TickInput::default(), &upgrades, &mut Silent).is_some() {
                reports += 1;
            }
            let health = state.target.as_ref().unwrap().current_health;
            prop_assert!(health <= last);
            prop_assert!(health <= max_health);
            if last == 0 {
                prop_assert_eq!(health, 0);
            }
            last = health;
        }
        prop_assert!(reports <= 1);
    }
}

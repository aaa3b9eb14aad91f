//! Per-frame simulation step
//!
//! One call per display refresh. The order inside a frame is fixed:
//! input → castle sync → integrate → castle hit → ground → camera → report →
//! particle aging.

use glam::Vec2;

use super::collision::{self, GroundContact};
use super::cues::AudioSink;
use super::kinematics;
use super::mode::{GameMode, ModeEvent};
use super::outcome::{self, RoundOutcome};
use super::particles::colors;
use super::state::GameState;
use super::upgrades::UpgradeStats;
use crate::consts::LOGICAL_DT;

/// Side screens reachable from the menu and round-end screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Shop,
    Login,
    Leaderboard,
}

impl Screen {
    fn open_event(self) -> ModeEvent {
        match self {
            Screen::Shop => ModeEvent::OpenShop,
            Screen::Login => ModeEvent::OpenLogin,
            Screen::Leaderboard => ModeEvent::OpenLeaderboard,
        }
    }
}

/// Input collected between two frames. Handlers only write here; the next
/// tick reads and applies it.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer pressed at this screen position
    pub drag_start: Option<Vec2>,
    /// Latest pointer position while pressed
    pub drag_move: Option<Vec2>,
    /// Pointer released
    pub drag_end: bool,
    /// Pointer left the play surface
    pub pointer_left: bool,
    /// Close the current screen
    pub dismiss: bool,
    /// Advance past a cleared level
    pub next_level: bool,
    /// Open a side screen
    pub open: Option<Screen>,
}

/// Advance the game by one frame.
///
/// Returns the round outcome on the frame a shot ends, at most once per shot.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    upgrades: &UpgradeStats,
    audio: &mut dyn AudioSink,
) -> Option<RoundOutcome> {
    let upgrades = upgrades.clamped();

    apply_input(state, input, &upgrades, audio);

    state.heal_target();
    let ground_y = state.ground_y();
    if let Some(castle) = &mut state.target {
        castle.settle_on(ground_y);
    }

    let outcome = if state.mode.runs_physics() {
        step_flight(state, &upgrades, audio)
    } else {
        if state.mode.holds_at_muzzle() && state.projectile.pos != state.muzzle() {
            state.reset_round();
        }
        None
    };

    state.particles.age(&state.config);
    state.time_ticks += 1;

    outcome
}

fn apply_input(state: &mut GameState, input: &TickInput, upgrades: &UpgradeStats, audio: &mut dyn AudioSink) {
    if let Some(at) = input.drag_start {
        if state.transition(ModeEvent::DragStart) {
            state.drag.begin(at);
        }
    }

    if let Some(at) = input.drag_move {
        if state.mode == GameMode::Aiming {
            state.drag.current = Some(at);
        }
    }

    if input.drag_end {
        release_drag(state, upgrades, audio);
    }

    if input.pointer_left && state.transition(ModeEvent::PointerLeft) {
        state.drag.clear();
    }

    if input.next_level && state.transition(ModeEvent::NextLevel) {
        let next = state.level.saturating_add(1);
        state.reset_for_level(next);
    }

    if input.dismiss {
        state.transition(ModeEvent::Dismiss);
    }

    if let Some(screen) = input.open {
        state.transition(screen.open_event());
    }
}

/// Turn a finished drag into a launch or a cancel
fn release_drag(state: &mut GameState, upgrades: &UpgradeStats, audio: &mut dyn AudioSink) {
    if state.mode != GameMode::Aiming {
        return;
    }
    let Some((anchor, current)) = state.drag.ends() else {
        return;
    };
    state.drag.clear();

    match kinematics::solve_launch(anchor, current, upgrades.max_power, &state.config) {
        Some(solution) => {
            state.transition(ModeEvent::Launch);
            state.seed_launch(&solution);
            audio.on_launch();
            let muzzle = state.muzzle();
            state.particles.burst(muzzle, colors::MUZZLE, 15);
            log::info!(
                "Launch: pull={:.1} power={:.2} angle={:.1}°",
                solution.pull,
                solution.power,
                solution.angle.to_degrees()
            );
        }
        None => {
            state.transition(ModeEvent::Cancel);
        }
    }
}

/// One physics step for a shot in flight
fn step_flight(state: &mut GameState, upgrades: &UpgradeStats, audio: &mut dyn AudioSink) -> Option<RoundOutcome> {
    let air_resistance = upgrades.air_resistance(&state.config);
    kinematics::integrate(&mut state.projectile, LOGICAL_DT, air_resistance, &state.config);

    let mut ended = None;

    // Castle first: a hit on the frame the shot reaches the ground counts as a hit
    let hit = match state.target.as_mut() {
        Some(castle) => collision::resolve_target(&mut state.projectile, castle, &state.config)
            .map(|hit| (hit, castle.center())),
        None => None,
    };
    let destroyed = hit.is_some_and(|(hit, _)| hit.destroyed);

    if let Some((hit, castle_center)) = hit {
        state.last_damage = hit.damage;
        state.particles.burst(hit.point, colors::CASTLE_BODY, 10);
        state.particles.burst(hit.point, colors::SPARK, 5);
        audio.on_impact();

        if hit.destroyed {
            state.particles.burst(castle_center, colors::CASTLE_ACCENT, 50);
            state.transition(ModeEvent::TargetDestroyed);
            ended = Some(outcome::clear_outcome(state.projectile.pos.x, hit.damage, &state.config));
        }
    }

    if !destroyed {
        let ground_y = state.ground_y();
        match collision::resolve_ground(&mut state.projectile, ground_y, upgrades.bounciness, &state.config) {
            GroundContact::Bounce { .. } => {
                let pos = state.projectile.pos;
                state.particles.burst(pos, colors::BOUNCE, 5);
                audio.on_impact();
            }
            GroundContact::Settled => {
                state.transition(ModeEvent::Settled);
                ended = Some(outcome::landing_outcome(state.projectile.pos.x, &state.config));
            }
            GroundContact::Airborne | GroundContact::Rolling => {}
        }
    }

    state
        .camera
        .update(state.projectile.pos.x, state.viewport.x, &state.config);
    state.distance = outcome::distance_from_cannon(state.projectile.pos.x, &state.config);

    ended.and_then(|outcome| state.reporter.report(outcome))
}

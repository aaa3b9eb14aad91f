//! Game session
//!
//! Owns the simulation plus the between-round collaborators and is the only
//! place that hands round outcomes to progression, storage and the
//! leaderboard. Input handlers call the pointer methods, which only record
//! what happened; `frame` applies it on the next display refresh.

use glam::Vec2;

use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::persistence;
use crate::platform;
use crate::progression::Progression;
use crate::settings::Settings;
use crate::shop::{self, PurchaseError, UpgradeKind};
use crate::sim::{AudioSink, GameMode, GameState, RenderSnapshot, RoundOutcome, Screen, Silent, TickInput, tick};

/// Signed-in player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub uid: String,
    pub display_name: String,
}

pub struct Session<A: AudioSink = Silent> {
    pub state: GameState,
    pub progression: Progression,
    pub leaderboard: Leaderboard,
    settings: Settings,
    player: Option<PlayerProfile>,
    audio: A,
    /// Input recorded since the last frame
    input: TickInput,
}

impl<A: AudioSink> Session<A> {
    /// Fresh session with default progress
    pub fn new(seed: u64, viewport: Vec2, audio: A) -> Self {
        Self::with_state(GameState::new(seed, viewport), audio)
    }

    /// Session around an existing simulation state
    pub fn with_state(state: GameState, audio: A) -> Self {
        let mut session = Self {
            state,
            progression: Progression::default(),
            leaderboard: Leaderboard::new(),
            settings: Settings::default(),
            player: None,
            audio,
            input: TickInput::default(),
        };
        session.apply_settings();
        session
    }

    /// Session resumed from storage
    pub fn restore(seed: u64, viewport: Vec2, audio: A) -> Self {
        let save = persistence::load();
        let mut session = Self::new(seed, viewport, audio);
        session.progression = save.progression;
        session.leaderboard = Leaderboard::load();
        session.settings = Settings::load();
        session.apply_settings();
        session.state.reset_for_level(save.level);
        session
    }

    // === Input ===

    /// Moves recorded before the press are hover, not part of the drag
    pub fn drag_start(&mut self, at: Vec2) {
        self.input.drag_start = Some(at);
        self.input.drag_move = None;
        self.input.drag_end = false;
    }

    pub fn drag_move(&mut self, at: Vec2) {
        self.input.drag_move = Some(at);
    }

    pub fn drag_end(&mut self) {
        self.input.drag_end = true;
    }

    pub fn pointer_leave(&mut self) {
        self.input.pointer_left = true;
    }

    pub fn dismiss(&mut self) {
        self.input.dismiss = true;
    }

    pub fn next_level(&mut self) {
        self.input.next_level = true;
    }

    pub fn open(&mut self, screen: Screen) {
        self.input.open = Some(screen);
    }

    // === Frame ===

    /// Advance one frame. Returns the outcome on the frame a shot ends.
    pub fn frame(&mut self) -> Option<RoundOutcome> {
        let input = std::mem::take(&mut self.input);
        let level_before = self.state.level;

        let outcome = tick(&mut self.state, &input, &self.progression.upgrades, &mut self.audio);

        match outcome {
            Some(outcome) => self.record(&outcome, level_before),
            None if self.state.level != level_before => {
                persistence::save(&self.progression, self.state.level);
            }
            None => {}
        }
        outcome
    }

    /// Hand a finished round to progression, storage and the leaderboard
    fn record(&mut self, outcome: &RoundOutcome, level: u32) {
        let new_best = self.progression.apply_outcome(outcome, level);
        persistence::save(&self.progression, self.state.level);

        if !new_best {
            return;
        }
        let Some(player) = &self.player else {
            log::debug!("New best while signed out, leaderboard not updated");
            return;
        };
        let entry = LeaderboardEntry {
            uid: player.uid.clone(),
            display_name: player.display_name.clone(),
            score: self.progression.stats.best_distance,
            level,
            timestamp: platform::now_ms(),
        };
        if let Some(rank) = self.leaderboard.submit(entry) {
            log::info!("{} is now #{} on the leaderboard", player.display_name, rank);
            self.leaderboard.save();
        }
    }

    // === Shop ===

    /// Buy an upgrade. The shop is closed while a shot is in flight.
    pub fn buy(&mut self, kind: UpgradeKind) -> Result<u64, PurchaseError> {
        if self.state.mode == GameMode::Firing {
            return Err(PurchaseError::ShotInFlight);
        }
        let paid = shop::buy(&mut self.progression.upgrades, kind)?;
        self.audio.on_purchase();
        persistence::save(&self.progression, self.state.level);
        Ok(paid)
    }

    /// Wipe saved progress and start over at level 1. Refused mid-shot.
    pub fn reset_progress(&mut self) -> bool {
        if self.state.mode == GameMode::Firing {
            return false;
        }
        persistence::clear();
        self.progression = Progression::default();
        self.state.reset_round();
        self.state.reset_for_level(1);
        self.state.mode = GameMode::Menu;
        true
    }

    // === Player ===

    pub fn sign_in(&mut self, uid: impl Into<String>, display_name: impl Into<String>) {
        let profile = PlayerProfile {
            uid: uid.into(),
            display_name: display_name.into(),
        };
        log::info!("Signed in as {}", profile.display_name);
        self.player = Some(profile);
        if self.state.mode == GameMode::Login {
            self.dismiss();
        }
    }

    pub fn sign_out(&mut self) {
        if let Some(profile) = self.player.take() {
            log::info!("Signed out {}", profile.display_name);
        }
    }

    pub fn player(&self) -> Option<&PlayerProfile> {
        self.player.as_ref()
    }

    // === Presentation ===

    /// Render view with the trajectory preview filtered by settings
    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        let mut snapshot = self.state.snapshot(self.progression.upgrades.max_power);
        if !self.settings.show_trajectory {
            if let Some(aim) = &mut snapshot.aim {
                aim.points.clear();
            }
        }
        snapshot
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.state.set_viewport(viewport);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace player settings; they take effect immediately and are saved
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
        self.apply_settings();
        self.settings.save();
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    fn apply_settings(&mut self) {
        self.state.particles.set_cap(self.settings.max_particles());
        self.audio.set_volume(self.settings.effective_volume());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::{CueCounter, PhysicsConfig};

    fn viewport() -> Vec2 {
        Vec2::new(1280.0, 720.0)
    }

    fn fire(session: &mut Session<impl AudioSink>, from: Vec2, to: Vec2) {
        session.drag_start(from);
        session.frame();
        session.drag_move(to);
        session.drag_end();
        session.frame();
    }

    fn run_until_outcome(session: &mut Session<impl AudioSink>) -> Option<RoundOutcome> {
        (0..5000).find_map(|_| session.frame())
    }

    fn free_flight() -> Session<CueCounter> {
        let state = GameState::without_target(7, viewport(), PhysicsConfig::default());
        Session::with_state(state, CueCounter::default())
    }

    #[test]
    fn test_clear_pays_and_unlocks() {
        let mut session = Session::new(1, viewport(), Silent);
        fire(&mut session, Vec2::new(400.0, 400.0), Vec2::new(200.0, 400.0));
        let outcome = run_until_outcome(&mut session).expect("shot should end");

        assert!(outcome.level_cleared);
        assert_eq!(session.progression.upgrades.money, outcome.money_earned);
        assert_eq!(session.progression.stats.max_level, 2);

        session.next_level();
        session.frame();
        assert_eq!(session.state.level, 2);
    }

    #[test]
    fn test_outcome_applied_once() {
        let mut session = free_flight();
        fire(&mut session, Vec2::new(400.0, 400.0), Vec2::new(200.0, 400.0));
        let outcome = run_until_outcome(&mut session).expect("shot should land");
        let money = session.progression.upgrades.money;
        assert_eq!(money, outcome.money_earned);

        for _ in 0..100 {
            assert!(session.frame().is_none());
        }
        assert_eq!(session.progression.upgrades.money, money);
    }

    #[test]
    fn test_leaderboard_only_for_signed_in_best() {
        let mut session = free_flight();
        fire(&mut session, Vec2::new(400.0, 400.0), Vec2::new(200.0, 400.0));
        run_until_outcome(&mut session);
        assert!(session.leaderboard.is_empty());

        session.dismiss();
        session.frame();
        session.sign_in("u1", "Ada");
        fire(&mut session, Vec2::new(400.0, 400.0), Vec2::new(200.0, 400.0));
        let outcome = run_until_outcome(&mut session).unwrap();
        // Same shot again is not a new best
        assert!(session.leaderboard.is_empty());
        assert_eq!(outcome.final_distance, session.progression.stats.best_distance);

        session.dismiss();
        session.frame();
        session.progression.stats.best_distance = 0;
        fire(&mut session, Vec2::new(400.0, 400.0), Vec2::new(200.0, 400.0));
        run_until_outcome(&mut session).unwrap();
        let entry = session.leaderboard.entry_for("u1").expect("entry written");
        assert_eq!(entry.display_name, "Ada");
        assert_eq!(entry.score, session.progression.stats.best_distance);
    }

    #[test]
    fn test_shop_closed_during_flight() {
        let mut session = free_flight();
        session.progression.upgrades.money = 1000;
        fire(&mut session, Vec2::new(400.0, 400.0), Vec2::new(200.0, 400.0));
        assert_eq!(session.state.mode, GameMode::Firing);
        assert_eq!(session.buy(UpgradeKind::Power), Err(PurchaseError::ShotInFlight));

        run_until_outcome(&mut session);
        assert_eq!(session.buy(UpgradeKind::Power), Ok(100));
        assert_eq!(session.progression.upgrades.max_power, 16.0);
        assert_eq!(session.audio().purchases, 1);
        assert_eq!(session.audio().launches, 1);
    }

    #[test]
    fn test_hover_then_click_does_not_fire() {
        let mut session = Session::new(1, viewport(), CueCounter::default());
        let muzzle = session.state.muzzle();

        session.drag_move(Vec2::new(300.0, 400.0));
        session.drag_start(Vec2::new(400.0, 400.0));
        session.frame();
        assert_eq!(session.state.drag.current, Some(Vec2::new(400.0, 400.0)));

        session.drag_end();
        session.frame();
        assert_eq!(session.state.mode, GameMode::Menu);
        assert_eq!(session.state.projectile.vel, Vec2::ZERO);
        assert_eq!(session.state.projectile.pos, muzzle);
        assert_eq!(session.audio().launches, 0);
    }

    #[test]
    fn test_move_after_press_still_counts() {
        let mut session = Session::new(1, viewport(), CueCounter::default());
        session.drag_start(Vec2::new(400.0, 400.0));
        session.drag_move(Vec2::new(200.0, 400.0));
        session.frame();
        assert_eq!(session.state.drag.current, Some(Vec2::new(200.0, 400.0)));

        session.drag_end();
        session.frame();
        assert_eq!(session.state.mode, GameMode::Firing);
        assert_eq!(session.audio().launches, 1);
    }

    #[test]
    fn test_reset_progress() {
        let mut session = Session::new(1, viewport(), Silent);
        fire(&mut session, Vec2::new(400.0, 400.0), Vec2::new(200.0, 400.0));
        assert!(!session.reset_progress());

        run_until_outcome(&mut session);
        session.next_level();
        session.frame();
        assert_eq!(session.state.level, 2);

        assert!(session.reset_progress());
        assert_eq!(session.state.level, 1);
        assert_eq!(session.state.mode, GameMode::Menu);
        assert_eq!(session.progression, Progression::default());
        assert_eq!(session.state.target.as_ref().unwrap().max_health, 50);
    }

    #[test]
    fn test_hidden_trajectory() {
        let mut session = Session::new(1, viewport(), Silent);
        session.drag_start(Vec2::new(400.0, 400.0));
        session.frame();
        session.drag_move(Vec2::new(300.0, 300.0));
        session.frame();
        assert!(!session.snapshot().aim.unwrap().points.is_empty());

        session.set_settings(Settings {
            show_trajectory: false,
            ..Settings::default()
        });
        let aim = session.snapshot().aim.unwrap();
        assert!(aim.points.is_empty());
        assert!(aim.armed);
    }

    #[test]
    fn test_settings_reach_audio_and_particles() {
        let mut session = Session::new(1, viewport(), CueCounter::default());
        assert_eq!(session.audio().volume, Some(0.8));

        session.set_settings(Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            quality: QualityPreset::Low,
            ..Settings::default()
        });
        assert_eq!(session.audio().volume, Some(0.25));

        session.set_settings(Settings {
            muted: true,
            ..session.settings().clone()
        });
        assert_eq!(session.audio().volume, Some(0.0));
        assert_eq!(session.settings().quality, QualityPreset::Low);

        session.progression.upgrades.bounciness = 0.9;
        for _ in 0..5 {
            fire(&mut session, Vec2::new(400.0, 400.0), Vec2::new(200.0, 400.0));
            run_until_outcome(&mut session);
            session.dismiss();
            session.frame();
        }
        assert!(session.state.particles.len() <= 100);
    }

    #[test]
    fn test_particles_off_caps_pool() {
        let mut session = Session::new(1, viewport(), Silent);
        session.set_settings(Settings {
            particles: false,
            ..Settings::default()
        });
        fire(&mut session, Vec2::new(400.0, 400.0), Vec2::new(200.0, 400.0));
        assert!(session.state.particles.is_empty());
    }
}

//! Game mode state machine
//!
//! Every legal transition is in `GameMode::on`. Anything not listed there is
//! ignored in the current mode.

use serde::{Deserialize, Serialize};

/// Current mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Idle at the cannon, waiting for a drag
    #[default]
    Menu,
    /// Drag in progress
    Aiming,
    /// Projectile in flight; the only mode that runs physics
    Firing,
    /// Shot came to rest
    Landed,
    /// Shot destroyed the castle
    LevelCleared,
    /// Upgrade shop screen
    Shop,
    /// Sign-in screen
    Login,
    /// Leaderboard screen
    Leaderboard,
}

/// Things that can move the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    DragStart,
    /// Released with a pull at or above the threshold
    Launch,
    /// Released with a pull below the threshold
    Cancel,
    /// Pointer left the tracking surface mid-drag
    PointerLeft,
    TargetDestroyed,
    Settled,
    Dismiss,
    NextLevel,
    OpenShop,
    OpenLogin,
    OpenLeaderboard,
}

impl GameMode {
    /// Transition table. `None` leaves the mode unchanged.
    pub fn on(self, event: ModeEvent) -> Option<GameMode> {
        use GameMode::*;
        use ModeEvent::*;

        match (self, event) {
            (Menu | Aiming, DragStart) => Some(Aiming),
            (Aiming, Launch) => Some(Firing),
            (Aiming, Cancel | PointerLeft) => Some(Menu),
            (Firing, TargetDestroyed) => Some(LevelCleared),
            (Firing, Settled) => Some(Landed),
            (Landed | LevelCleared | Shop | Login | Leaderboard, Dismiss) => Some(Menu),
            (LevelCleared, NextLevel) => Some(Menu),
            (Menu | Landed | LevelCleared, OpenShop) => Some(Shop),
            (Menu | Landed | LevelCleared, OpenLogin) => Some(Login),
            (Menu | Landed | LevelCleared, OpenLeaderboard) => Some(Leaderboard),
            _ => None,
        }
    }

    /// Physics only advances while a shot is in flight
    #[inline]
    pub fn runs_physics(self) -> bool {
        self == GameMode::Firing
    }

    /// Modes in which the projectile sits at the muzzle
    #[inline]
    pub fn holds_at_muzzle(self) -> bool {
        matches!(self, GameMode::Menu | GameMode::Aiming)
    }
}

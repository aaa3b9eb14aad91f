//! Save/load of player progress
//!
//! Features:
//! - Versioned JSON envelope
//! - Values clamped on load so a tampered or stale save cannot break play
//! - Unreadable saves fall back to a fresh start

use serde::{Deserialize, Serialize};

use crate::platform::storage;
use crate::progression::Progression;

/// Current envelope version
pub const SAVE_VERSION: u32 = 1;

const STORAGE_KEY: &str = "castle_cannon_save";

/// What gets written to storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    pub progression: Progression,
    /// Level the player was on
    #[serde(default = "first_level")]
    pub level: u32,
}

fn first_level() -> u32 {
    1
}

/// Why a save could not be used
#[derive(Debug)]
pub enum LoadError {
    Parse(serde_json::Error),
    UnsupportedVersion(u32),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Parse(e) => write!(f, "malformed save: {}", e),
            LoadError::UnsupportedVersion(v) => write!(f, "unsupported save version {}", v),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Parse(e) => Some(e),
            LoadError::UnsupportedVersion(_) => None,
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Parse(e)
    }
}

impl SaveEnvelope {
    pub fn new(progression: Progression, level: u32) -> Self {
        Self {
            version: SAVE_VERSION,
            progression,
            level,
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a save and repair out-of-range values
    pub fn decode(json: &str) -> Result<Self, LoadError> {
        let envelope: SaveEnvelope = serde_json::from_str(json)?;
        if envelope.version == 0 || envelope.version > SAVE_VERSION {
            return Err(LoadError::UnsupportedVersion(envelope.version));
        }

        let progression = envelope.progression.sanitized();
        if progression != envelope.progression {
            log::warn!("Save contained out-of-range values, clamped");
        }
        // Only unlocked levels can be resumed
        let level = envelope.level.clamp(1, progression.stats.max_level);
        if level != envelope.level {
            log::warn!("Saved level {} not unlocked, resuming at {}", envelope.level, level);
        }

        Ok(Self {
            version: SAVE_VERSION,
            progression,
            level,
        })
    }
}

/// Load the saved envelope, or a fresh one if there is none or it is unusable
pub fn load() -> SaveEnvelope {
    let Some(json) = storage::load_item(STORAGE_KEY) else {
        log::info!("No save found, starting fresh");
        return SaveEnvelope::new(Progression::default(), 1);
    };
    match SaveEnvelope::decode(&json) {
        Ok(envelope) => {
            log::info!(
                "Loaded save: level {} money {}",
                envelope.level,
                envelope.progression.upgrades.money
            );
            envelope
        }
        Err(e) => {
            log::warn!("Ignoring save: {}", e);
            SaveEnvelope::new(Progression::default(), 1)
        }
    }
}

/// Write progress; failures are logged and otherwise ignored
pub fn save(progression: &Progression, level: u32) {
    match SaveEnvelope::new(*progression, level).encode() {
        Ok(json) => {
            if storage::store_item(STORAGE_KEY, &json) {
                log::debug!("Progress saved (level {})", level);
            }
        }
        Err(e) => log::warn!("Failed to encode save: {}", e),
    }
}

pub fn clear() {
    storage::remove_item(STORAGE_KEY);
    log::info!("Save cleared");
}

//! Distance leaderboard
//!
//! Persisted to LocalStorage, keeps the top 10 players by best distance with
//! one entry per player.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Stable player id
    pub uid: String,
    pub display_name: String,
    /// Best distance in pixels
    pub score: i32,
    /// Level the score was set on
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Local leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "castle_cannon_leaderboard";

    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Current entry for a player
    pub fn entry_for(&self, uid: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.uid == uid)
    }

    /// Check if a score would change the board for this player
    pub fn qualifies(&self, uid: &str, score: i32) -> bool {
        if score <= 0 {
            return false;
        }
        if let Some(existing) = self.entry_for(uid) {
            return score > existing.score;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a score. A player's existing row is only replaced by a strictly
    /// better score. Returns the rank achieved or None if nothing changed.
    pub fn submit(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        if !self.qualifies(&entry.uid, entry.score) {
            return None;
        }

        self.entries.retain(|e| e.uid != entry.uid);

        // Ties keep the earlier score ahead
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restore ordering and uniqueness after loading untrusted data
    fn normalized(mut self) -> Self {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        let mut seen = std::collections::HashSet::new();
        self.entries.retain(|e| seen.insert(e.uid.clone()));
        self.entries.truncate(MAX_ENTRIES);
        self
    }

    pub fn load() -> Self {
        if let Some(json) = storage::load_item(Self::STORAGE_KEY) {
            match serde_json::from_str::<Leaderboard>(&json) {
                Ok(board) => {
                    let board = board.normalized();
                    log::info!("Loaded {} leaderboard entries", board.entries.len());
                    return board;
                }
                Err(e) => log::warn!("Discarding unreadable leaderboard: {}", e),
            }
        }

        log::info!("No leaderboard found, starting fresh");
        Self::new()
    }

    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            if storage::store_item(Self::STORAGE_KEY, &json) {
                log::info!("Leaderboard saved ({} entries)", self.entries.len());
            }
        }
    }
}

/// Format a timestamp as a relative date string
#[cfg(target_arch = "wasm32")]
pub fn format_date(timestamp: f64) -> String {
    let diff_mins = (js_sys::Date::now() - timestamp) / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 7.0 {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
        format!("{}/{}/{}", date.get_month() + 1, date.get_date(), date.get_full_year() % 100)
    } else if diff_days >= 2.0 {
        format!("{} days ago", diff_days.floor() as i32)
    } else if diff_days >= 1.0 {
        "Yesterday".to_string()
    } else if diff_hours >= 1.0 {
        format!("{}h ago", diff_hours.floor() as i32)
    } else if diff_mins >= 1.0 {
        format!("{}m ago", diff_mins.floor() as i32)
    } else {
        "Just now".to_string()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(_timestamp: f64) -> String {
    "N/A".to_string()
}

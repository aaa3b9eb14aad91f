//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (leaderboard timestamps)
//! - Key/value storage (LocalStorage on web, nothing on native)
//! - The display-refresh loop (requestAnimationFrame on web)

#[cfg(target_arch = "wasm32")]
pub mod animation;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub use animation::AnimationLoop;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

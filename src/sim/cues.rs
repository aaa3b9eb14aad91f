//! Audio cue sink
//!
//! The simulation calls these at launch and on every bounce or castle hit;
//! the session adds a cue for shop purchases.
//! Calls are fire-and-forget; an implementation that fails must swallow it.

/// Receiver for simulation sound cues
pub trait AudioSink {
    /// Projectile left the cannon
    fn on_launch(&mut self);
    /// Ground bounce or castle hit
    fn on_impact(&mut self);
    /// Shop purchase went through
    fn on_purchase(&mut self) {}
    /// Output level in [0, 1] after player settings change
    fn set_volume(&mut self, _volume: f32) {}
}

/// Sink that drops every cue (headless runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn on_launch(&mut self) {}
    fn on_impact(&mut self) {}
}

/// Sink that counts cues
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CueCounter {
    pub launches: u32,
    pub impacts: u32,
    pub purchases: u32,
    /// Last volume handed over
    pub volume: Option<f32>,
}

impl AudioSink for CueCounter {
    fn on_launch(&mut self) {
        self.launches += 1;
    }

    fn on_impact(&mut self) {
        self.impacts += 1;
    }

    fn on_purchase(&mut self) {
        self.purchases += 1;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = Some(volume);
    }
}

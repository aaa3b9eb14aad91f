//! Audio cues using the Web Audio API
//!
//! Sounds are synthesized from oscillators; there are no asset files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::AudioSink;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Cannon fires
    Launch,
    /// Ground bounce or castle hit
    Impact,
    /// Upgrade bought
    Coin,
}

/// Web Audio sink for simulation cues
pub struct WebAudio {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl Default for WebAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudio {
    pub fn new() -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, volume: 0.8 }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Launch => play_boom(ctx, vol),
            SoundEffect::Impact => play_thud(ctx, vol),
            SoundEffect::Coin => play_coin(ctx, vol),
        }
    }
}

impl AudioSink for WebAudio {
    fn on_launch(&mut self) {
        self.play(SoundEffect::Launch);
    }

    fn on_impact(&mut self) {
        self.play(SoundEffect::Impact);
    }

    fn on_purchase(&mut self) {
        self.play(SoundEffect::Coin);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

/// Oscillator routed through a gain node to the speakers
fn voice(ctx: &AudioContext, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

/// Cannon shot: falling sawtooth over a sub thump
fn play_boom(ctx: &AudioContext, vol: f32) {
    let t = ctx.current_time();

    if let Some((osc, gain)) = voice(ctx, 180.0, OscillatorType::Sawtooth) {
        gain.gain().set_value_at_time(vol * 0.45, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.35).ok();
        osc.frequency().exponential_ramp_to_value_at_time(40.0, t + 0.3).ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.4).ok();
    }

    if let Some((osc, gain)) = voice(ctx, 55.0, OscillatorType::Sine) {
        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.25).ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }
}

/// Impact: short low knock
fn play_thud(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = voice(ctx, 140.0, OscillatorType::Triangle) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.4, t).ok();
    gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.12).ok();
    osc.frequency().exponential_ramp_to_value_at_time(70.0, t + 0.1).ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.15).ok();
}

/// Coin: two quick rising notes
fn play_coin(ctx: &AudioContext, vol: f32) {
    for (i, freq) in [988.0, 1319.0].iter().enumerate() {
        let Some((osc, gain)) = voice(ctx, *freq, OscillatorType::Square) else {
            continue;
        };
        let t = ctx.current_time() + i as f64 * 0.07;
        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.2).ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.25).ok();
    }
}

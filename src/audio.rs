//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Native builds keep the event mapping and volume logic but produce no
//! sound.

use crate::settings::RunConfig;
use crate::sim::{EndReason, GameEvent};
#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Gravity flipped
    Flip,
    /// Pursuer stomped
    Stomp,
    /// Collectible picked up
    Collect,
    /// Run ended by damage
    Death,
    /// Run ended any other way
    GameOver,
    /// New high score
    HighScore,
}

/// Map a simulation event to the effect it should trigger, if any.
pub fn effect_for_event(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::GravityFlipped { .. } => Some(SoundEffect::Flip),
        GameEvent::Stomped { .. } => Some(SoundEffect::Stomp),
        GameEvent::Collected { .. } => Some(SoundEffect::Collect),
        GameEvent::RunEnded {
            reason: EndReason::Damage,
        } => Some(SoundEffect::Death),
        GameEvent::RunEnded { .. } => Some(SoundEffect::GameOver),
        GameEvent::SegmentGenerated { .. } | GameEvent::PursuerSpawned { .. } => None,
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(config: &RunConfig) -> Self {
        #[cfg(target_arch = "wasm32")]
        let ctx = {
            // May fail outside a secure context.
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            ctx
        };
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx,
            sfx_volume: config.sfx_volume.clamp(0.0, 1.0),
            muted: config.muted,
        }
    }

    /// Resume audio context (required after user gesture)
    #[cfg(target_arch = "wasm32")]
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn resume(&self) {}

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }

    /// Play a sound effect
    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Flip => self.play_flip(ctx, vol),
            SoundEffect::Stomp => self.play_stomp(ctx, vol),
            SoundEffect::Collect => self.play_collect(ctx, vol),
            SoundEffect::Death => self.play_death(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::HighScore => self.play_high_score(ctx, vol),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol > 0.0 {
            log::debug!("sfx {effect:?} at {vol:.2}");
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    #[cfg(target_arch = "wasm32")]
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Gravity flip - quick pitch inversion whoosh
    #[cfg(target_arch = "wasm32")]
    fn play_flip(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(700.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.18).ok();
    }

    /// Stomp - solid thump with a crack on top
    #[cfg(target_arch = "wasm32")]
    fn play_stomp(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.12)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
        }
    }

    /// Pickup collect - happy ding
    #[cfg(target_arch = "wasm32")]
    fn play_collect(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Death - ominous descend
    #[cfg(target_arch = "wasm32")]
    fn play_death(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.6)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(30.0, t + 0.6)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.7).ok();
    }

    /// Game over - sad descending
    #[cfg(target_arch = "wasm32")]
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }

    /// High score - celebratory
    #[cfg(target_arch = "wasm32")]
    fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }
}

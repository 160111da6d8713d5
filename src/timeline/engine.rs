//! Pure `(t, config) -> AnimationFrame` computation.
//!
//! Sinusoidal signals run at a whole number of cycles per loop (see
//! [`crate::foundation::core::loop_cycles`]), so frames at `t = 0` and `t -> 8` meet without a
//! seam. Halo rotation is a plain angle and keeps its exact rate. Per-seed offsets are derived
//! once per engine from [`hash_to_float`] and never change.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use smallvec::SmallVec;

use crate::animation::ease::Ease;
use crate::animation::hash::{hash_to_float, salt};
use crate::foundation::core::{LOOP_DURATION_SECS, loop_angle, loop_cycles, wrap_loop_time};
use crate::foundation::math::{clamp_range, clamp01, fract, wrap_deg};
use crate::profile::tables::{MotionProfile, MotionTables};
use crate::timeline::config::TimelineConfig;
use crate::timeline::frame::{
    AnimationFrame, HaloBand, HaloFrame, MessageFrame, RadarFrame, StarLayer, StarsFrame,
};
use crate::timeline::reduced::reduced_motion_frame;

const BAND_SPACING_DEG: f64 = 60.0;
const BAND_PHASE_STEP: f64 = TAU / 3.0;
const BAND_OPACITY_STEP: f64 = 0.25;
const HALO_DEG_PER_SEC: f64 = 45.0;

const BACKGROUND_RATE: f64 = 0.5;
const BACKGROUND_AMPLITUDE: f64 = 0.6;

const INHALE_SHARE: f64 = 0.6;
const MESSAGE_FADE_SHARE: f64 = 0.15;

/// Per-seed offsets shared by every frame of one engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LayerSignature {
    pub(crate) band_offset_deg: [f64; 3],
    pub(crate) star_foreground_offset_s: f64,
    pub(crate) star_background_offset_s: f64,
    pub(crate) drift_phase: f64,
    pub(crate) wobble_phase: f64,
    pub(crate) secondary_wobble_freq: f64,
    pub(crate) breath_offset: f64,
    pub(crate) message_phase: f64,
}

impl LayerSignature {
    pub(crate) fn from_seed(seed: i64) -> Self {
        Self {
            band_offset_deg: [0u64, 1, 2].map(|i| hash_to_float(seed, i) * 360.0),
            star_foreground_offset_s: hash_to_float(seed, salt::STAR_FOREGROUND)
                * LOOP_DURATION_SECS,
            star_background_offset_s: hash_to_float(seed, salt::STAR_BACKGROUND)
                * LOOP_DURATION_SECS,
            drift_phase: hash_to_float(seed, salt::STAR_DRIFT_PHASE) * TAU,
            wobble_phase: hash_to_float(seed, salt::RADAR_WOBBLE) * TAU,
            secondary_wobble_freq: 1.5 + hash_to_float(seed, salt::RADAR_SECONDARY) * 0.5,
            breath_offset: hash_to_float(seed, salt::RADAR_BREATH),
            message_phase: hash_to_float(seed, salt::MESSAGE) * TAU,
        }
    }
}

/// Frame producer for one selection.
///
/// Holds only values derived from the config at construction, so [`TimelineEngine::frame`] is
/// a pure function of `t`. With `reduce_motion` set, the static frame is built here once and
/// every call returns a copy of it.
#[derive(Clone, Debug)]
pub struct TimelineEngine {
    config: TimelineConfig,
    profile: MotionProfile,
    dose: f64,
    signature: LayerSignature,
    frozen: Option<AnimationFrame>,
}

impl TimelineEngine {
    /// Resolve `config` against `tables`.
    pub fn new(config: TimelineConfig, tables: &MotionTables) -> Self {
        let profile = *tables.profile(config.category);
        let dose = tables.multiplier(config.intensity);
        let signature = LayerSignature::from_seed(config.seed);
        let frozen = config
            .reduce_motion
            .then(|| reduced_motion_frame(&profile, dose, &signature));
        Self {
            config,
            profile,
            dose,
            signature,
            frozen,
        }
    }

    /// Selection this engine was built for.
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Resolved motion profile.
    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Resolved intensity multiplier.
    pub fn dose(&self) -> f64 {
        self.dose
    }

    /// Number of halo bands every frame of this engine carries.
    pub fn band_count(&self) -> usize {
        usize::from(self.profile.halo_band_count)
    }

    /// Whether frames are time-invariant.
    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    /// Frame at time `t` seconds. Any `t` is accepted; it is wrapped into the loop.
    pub fn frame(&self, t: f64) -> AnimationFrame {
        match &self.frozen {
            Some(f) => f.clone(),
            None => self.compute(wrap_loop_time(t)),
        }
    }

    fn compute(&self, t: f64) -> AnimationFrame {
        let p = &self.profile;
        let sig = &self.signature;
        let dose = self.dose;

        let [fg, bg] = star_cycles(p.star_twinkle_rate);

        AnimationFrame {
            t,
            loop_progress: t / LOOP_DURATION_SECS,
            halo: halo(t, p, sig, dose, self.band_count()),
            stars: StarsFrame {
                foreground: star_layer(
                    t + sig.star_foreground_offset_s,
                    fg,
                    p.star_drift_amplitude,
                    sig.drift_phase,
                    dose,
                ),
                background: star_layer(
                    t + sig.star_background_offset_s,
                    bg,
                    p.star_drift_amplitude * BACKGROUND_AMPLITUDE,
                    sig.drift_phase,
                    dose,
                ),
            },
            radar: radar(t, p, sig, dose),
            message: message(t, p, sig, dose),
            global_intensity: clamp_range(dose, 0.0, MotionTables::MAX_MULTIPLIER),
            reduce_motion: false,
        }
    }
}

/// One-shot convenience over [`TimelineEngine`].
pub fn compute_frame(t: f64, config: &TimelineConfig, tables: &MotionTables) -> AnimationFrame {
    TimelineEngine::new(*config, tables).frame(t)
}

fn halo(t: f64, p: &MotionProfile, sig: &LayerSignature, dose: f64, bands: usize) -> HaloFrame {
    // sin(speed * t * pi) runs at speed / 2 Hz.
    let wave = loop_cycles(p.halo_speed / 2.0);

    let bands = (0..bands.min(3))
        .map(|i| {
            let fi = i as f64;
            let spin = p.halo_speed * t * HALO_DEG_PER_SEC;
            let rotation = spin + sig.band_offset_deg[i] + fi * BAND_SPACING_DEG;
            let s = (loop_angle(t, wave) + fi * BAND_PHASE_STEP).sin();
            HaloBand {
                intensity: clamp01(0.5 + 0.3 * s * dose),
                rotation_deg: wrap_deg(rotation),
                layer_opacity: 1.0 - fi * BAND_OPACITY_STEP,
            }
        })
        .collect::<SmallVec<_>>();
    HaloFrame { bands }
}

/// Cycles per loop for one star layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StarCycles {
    pub(crate) twinkle: f64,
    pub(crate) drift: f64,
}

/// `[foreground, background]` cycle counts. The background counts are snapped first and the
/// foreground ones doubled from them, so the background runs at exactly half speed.
pub(crate) fn star_cycles(twinkle_rate_hz: f64) -> [StarCycles; 2] {
    let bg = StarCycles {
        twinkle: loop_cycles(twinkle_rate_hz * BACKGROUND_RATE),
        drift: loop_cycles(twinkle_rate_hz * BACKGROUND_RATE * 0.5),
    };
    let fg = StarCycles {
        twinkle: bg.twinkle / BACKGROUND_RATE,
        drift: bg.drift / BACKGROUND_RATE,
    };
    [fg, bg]
}

/// `t` already includes the layer's seed offset.
fn star_layer(
    t: f64,
    cycles: StarCycles,
    amplitude: f64,
    drift_phase: f64,
    dose: f64,
) -> StarLayer {
    let twinkle = loop_angle(t, cycles.twinkle);
    let drift = loop_angle(t, cycles.drift);
    StarLayer {
        twinkle: clamp01(0.5 + 0.4 * twinkle.sin() * dose),
        drift_x: clamp_range(amplitude * drift.sin() * dose, -1.0, 1.0),
        drift_y: clamp_range(
            amplitude * (drift + FRAC_PI_2 + drift_phase).sin() * dose,
            -1.0,
            1.0,
        ),
        scale: clamp_range(1.0 + 0.1 * (twinkle + PI / 3.0).sin() * dose, 0.8, 1.2),
    }
}

/// Asymmetric breath: eased inhale over the first 60% of a cycle, quicker exhale after.
/// `0` at both ends of the cycle, `1` at the top of the inhale.
pub(crate) fn breathing_curve(phase: f64) -> f64 {
    let phase = fract(phase);
    if phase < INHALE_SHARE {
        Ease::InOutSine.apply(phase / INHALE_SHARE)
    } else {
        1.0 - Ease::InOutSine.apply((phase - INHALE_SHARE) / (1.0 - INHALE_SHARE))
    }
}

fn radar(t: f64, p: &MotionProfile, sig: &LayerSignature, dose: f64) -> RadarFrame {
    let breaths = loop_cycles(p.breathing_rate);
    let breathing_phase = fract(breaths * t / LOOP_DURATION_SECS + sig.breath_offset);
    let wobble = loop_angle(t, loop_cycles(p.breathing_rate * 2.0)) + sig.wobble_phase;
    RadarFrame {
        wobble: clamp01(0.5 + 0.3 * wobble.sin() * p.radar_wobble_strength * dose),
        pulse: clamp_range(0.1 * breathing_curve(breathing_phase) * dose, 0.0, 0.1),
        secondary_wobble_freq: sig.secondary_wobble_freq,
        breathing_phase,
    }
}

/// Fade in over the first 15% of the loop, hold, fade out over the last 15%.
pub(crate) fn message_envelope(loop_progress: f64) -> f64 {
    let p = loop_progress;
    let v = if p < MESSAGE_FADE_SHARE {
        (p / MESSAGE_FADE_SHARE * FRAC_PI_2).sin()
    } else if p > 1.0 - MESSAGE_FADE_SHARE {
        ((1.0 - p) / MESSAGE_FADE_SHARE * FRAC_PI_2).sin()
    } else {
        1.0
    };
    clamp01(v)
}

fn message(t: f64, p: &MotionProfile, sig: &LayerSignature, dose: f64) -> MessageFrame {
    let wave = (loop_angle(t, loop_cycles(p.breathing_rate)) + sig.message_phase).sin();
    let base = 0.5 + 0.5 * wave;
    MessageFrame {
        opacity: message_envelope(t / LOOP_DURATION_SECS),
        scale: clamp_range(1.0 + 0.02 * wave * dose, 0.96, 1.04),
        glow_intensity: clamp01(base * p.message_glow_strength * dose),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/engine.rs"]
mod tests;

//! Field-by-field blending of two frames.
//!
//! Linear fields use [`lerp`], which is exact at both ends. Angles take the shortest arc, and
//! loop-local phases (`t`, `loop_progress`, `breathing_phase`) blend across their wrap point so
//! a transition near the loop seam never sweeps backwards through the whole loop.

use crate::foundation::core::LOOP_DURATION_SECS;
use crate::foundation::math::{lerp, lerp_deg, lerp_wrapped};
use crate::timeline::frame::{
    AnimationFrame, HaloBand, HaloFrame, MessageFrame, RadarFrame, StarLayer, StarsFrame,
};

/// Per-layer blend progress, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerProgress {
    /// Frame-level fields: `t`, `loop_progress`, `global_intensity`, `reduce_motion`.
    pub frame: f64,
    /// Halo bands.
    pub halo: f64,
    /// Both star layers.
    pub stars: f64,
    /// Radar polygon.
    pub radar: f64,
    /// Message text.
    pub message: f64,
}

impl LayerProgress {
    /// Same progress for every layer.
    pub const fn uniform(t: f64) -> Self {
        Self {
            frame: t,
            halo: t,
            stars: t,
            radar: t,
            message: t,
        }
    }
}

/// Blend `a` toward `b`. `t <= 0` (or NaN) returns `a`, `t >= 1` returns `b`, both exactly.
pub fn interpolate(a: &AnimationFrame, b: &AnimationFrame, t: f64) -> AnimationFrame {
    if t.is_nan() || t <= 0.0 {
        return a.clone();
    }
    if t >= 1.0 {
        return b.clone();
    }
    blend_layers(a, b, LayerProgress::uniform(t))
}

/// Blend each layer with its own progress. A layer at `<= 0` or `>= 1` is copied whole.
pub fn blend_layers(a: &AnimationFrame, b: &AnimationFrame, p: LayerProgress) -> AnimationFrame {
    let f = p.frame;
    AnimationFrame {
        t: pick(f, a.t, b.t, |x, y, t| lerp_wrapped(x, y, t, LOOP_DURATION_SECS)),
        loop_progress: pick(f, a.loop_progress, b.loop_progress, |x, y, t| {
            lerp_wrapped(x, y, t, 1.0)
        }),
        halo: blend_halo(&a.halo, &b.halo, p.halo),
        stars: StarsFrame {
            foreground: blend_star(&a.stars.foreground, &b.stars.foreground, p.stars),
            background: blend_star(&a.stars.background, &b.stars.background, p.stars),
        },
        radar: blend_radar(&a.radar, &b.radar, p.radar),
        message: blend_message(&a.message, &b.message, p.message),
        global_intensity: pick(f, a.global_intensity, b.global_intensity, lerp),
        // Boolean: switches halfway.
        reduce_motion: if f.is_nan() || f < 0.5 {
            a.reduce_motion
        } else {
            b.reduce_motion
        },
    }
}

/// `Some(false)` at the start, `Some(true)` at the end, `None` in between.
fn settled(t: f64) -> Option<bool> {
    if t.is_nan() || t <= 0.0 {
        Some(false)
    } else if t >= 1.0 {
        Some(true)
    } else {
        None
    }
}

fn pick(t: f64, a: f64, b: f64, mix: impl Fn(f64, f64, f64) -> f64) -> f64 {
    match settled(t) {
        Some(false) => a,
        Some(true) => b,
        None => mix(a, b, t),
    }
}

fn blend_halo(a: &HaloFrame, b: &HaloFrame, t: f64) -> HaloFrame {
    match settled(t) {
        Some(false) => return a.clone(),
        Some(true) => return b.clone(),
        None => {}
    }
    // Bands pair by index; a band present on one side only keeps its own values.
    let n = a.bands.len().max(b.bands.len());
    let bands = (0..n)
        .filter_map(|i| match (a.bands.get(i), b.bands.get(i)) {
            (Some(x), Some(y)) => Some(HaloBand {
                intensity: lerp(x.intensity, y.intensity, t),
                rotation_deg: lerp_deg(x.rotation_deg, y.rotation_deg, t),
                layer_opacity: lerp(x.layer_opacity, y.layer_opacity, t),
            }),
            (Some(only), None) | (None, Some(only)) => Some(*only),
            (None, None) => None,
        })
        .collect();
    HaloFrame { bands }
}

fn blend_star(a: &StarLayer, b: &StarLayer, t: f64) -> StarLayer {
    match settled(t) {
        Some(false) => *a,
        Some(true) => *b,
        None => StarLayer {
            twinkle: lerp(a.twinkle, b.twinkle, t),
            drift_x: lerp(a.drift_x, b.drift_x, t),
            drift_y: lerp(a.drift_y, b.drift_y, t),
            scale: lerp(a.scale, b.scale, t),
        },
    }
}

fn blend_radar(a: &RadarFrame, b: &RadarFrame, t: f64) -> RadarFrame {
    match settled(t) {
        Some(false) => *a,
        Some(true) => *b,
        None => RadarFrame {
            wobble: lerp(a.wobble, b.wobble, t),
            pulse: lerp(a.pulse, b.pulse, t),
            secondary_wobble_freq: lerp(a.secondary_wobble_freq, b.secondary_wobble_freq, t),
            breathing_phase: lerp_wrapped(a.breathing_phase, b.breathing_phase, t, 1.0),
        },
    }
}

fn blend_message(a: &MessageFrame, b: &MessageFrame, t: f64) -> MessageFrame {
    match settled(t) {
        Some(false) => *a,
        Some(true) => *b,
        None => MessageFrame {
            opacity: lerp(a.opacity, b.opacity, t),
            scale: lerp(a.scale, b.scale, t),
            glow_intensity: lerp(a.glow_intensity, b.glow_intensity, t),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interp/blend.rs"]
mod tests;

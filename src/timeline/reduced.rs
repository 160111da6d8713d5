use smallvec::SmallVec;

use crate::foundation::math::{clamp01, clamp_range, wrap_deg};
use crate::profile::tables::{EffectCategory, IntensityBucket, MotionProfile, MotionTables};
use crate::timeline::config::TimelineConfig;
use crate::timeline::engine::{LayerSignature, TimelineEngine};
use crate::timeline::frame::{
    AnimationFrame, HaloBand, HaloFrame, MessageFrame, RadarFrame, StarLayer, StarsFrame,
};

const STILL_STAR: StarLayer = StarLayer {
    twinkle: 0.5,
    drift_x: 0.0,
    drift_y: 0.0,
    scale: 1.0,
};

/// The frozen frame served when the host asks for reduced motion.
///
/// Bands sit at mid intensity at their static base angle, nothing drifts or wobbles and the
/// message is fully shown. Built once per engine.
pub(crate) fn reduced_motion_frame(
    profile: &MotionProfile,
    dose: f64,
    signature: &LayerSignature,
) -> AnimationFrame {
    let bands = (0..usize::from(profile.halo_band_count).min(3))
        .map(|i| HaloBand {
            intensity: 0.5,
            rotation_deg: wrap_deg(signature.band_offset_deg[i] + i as f64 * 60.0),
            layer_opacity: 1.0 - i as f64 * 0.25,
        })
        .collect::<SmallVec<_>>();

    AnimationFrame {
        t: 0.0,
        loop_progress: 0.0,
        halo: HaloFrame { bands },
        stars: StarsFrame {
            foreground: STILL_STAR,
            background: STILL_STAR,
        },
        radar: RadarFrame {
            wobble: 0.0,
            pulse: 0.0,
            secondary_wobble_freq: signature.secondary_wobble_freq,
            breathing_phase: 0.0,
        },
        message: MessageFrame {
            opacity: 1.0,
            scale: 1.0,
            glow_intensity: clamp01(0.5 * profile.message_glow_strength),
        },
        global_intensity: clamp_range(dose, 0.0, MotionTables::MAX_MULTIPLIER),
        reduce_motion: true,
    }
}

/// Selection used when a visualization's own configuration could not be built: the balanced
/// profile at unit intensity, seed `0`, frozen.
pub const FALLBACK_CONFIG: TimelineConfig = TimelineConfig {
    category: EffectCategory::Balanced,
    intensity: IntensityBucket::High,
    seed: 0,
    reduce_motion: true,
};

/// The static frame of [`FALLBACK_CONFIG`] over the built-in tables.
pub fn fallback_frame() -> AnimationFrame {
    TimelineEngine::new(FALLBACK_CONFIG, &MotionTables::builtin()).frame(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/reduced.rs"]
mod tests;

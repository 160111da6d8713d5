use crate::foundation::math::{clamp01, clamp_range, lerp, wrap_deg};
use crate::timeline::frame::{AnimationFrame, StarLayer};

/// Per-phase adjustments layered on top of an engine frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationContext {
    /// Degrees added to every halo band rotation.
    pub halo_rotation_bias_deg: f64,
    /// Radar energy, `[-1, 1]`. Positive values widen wobble and pulse.
    pub polygon_energy_bias: f64,
    /// Star twinkle/scale gain, `[0, 2]`.
    pub star_emphasis: f64,
}

impl AnimationContext {
    /// Context that leaves frames untouched.
    pub const NEUTRAL: Self = Self {
        halo_rotation_bias_deg: 0.0,
        polygon_energy_bias: 0.0,
        star_emphasis: 1.0,
    };

    /// Apply this context to `frame`.
    ///
    /// Reduced-motion frames are returned unchanged. Every adjusted field is re-clamped to its
    /// documented interval.
    pub fn apply(&self, mut frame: AnimationFrame) -> AnimationFrame {
        if frame.reduce_motion || *self == Self::NEUTRAL {
            return frame;
        }

        for band in frame.halo.bands.iter_mut() {
            band.rotation_deg = wrap_deg(band.rotation_deg + self.halo_rotation_bias_deg);
        }

        let k = 1.0 + clamp_range(self.polygon_energy_bias, -1.0, 1.0);
        frame.radar.wobble = clamp01(0.5 + (frame.radar.wobble - 0.5) * k);
        frame.radar.pulse = clamp_range(frame.radar.pulse * k, 0.0, 0.1);

        let emphasis = clamp_range(self.star_emphasis, 0.0, 2.0);
        emphasize(&mut frame.stars.foreground, emphasis);
        emphasize(&mut frame.stars.background, emphasis);
        frame
    }

    /// Field-wise blend; `t` is not clamped.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            halo_rotation_bias_deg: lerp(
                self.halo_rotation_bias_deg,
                other.halo_rotation_bias_deg,
                t,
            ),
            polygon_energy_bias: lerp(self.polygon_energy_bias, other.polygon_energy_bias, t),
            star_emphasis: lerp(self.star_emphasis, other.star_emphasis, t),
        }
    }
}

impl Default for AnimationContext {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

fn emphasize(layer: &mut StarLayer, emphasis: f64) {
    layer.twinkle = clamp01(0.5 + (layer.twinkle - 0.5) * emphasis);
    layer.scale = clamp_range(1.0 + (layer.scale - 1.0) * emphasis, 0.8, 1.2);
}

#[cfg(test)]
#[path = "../../tests/unit/phase/context.rs"]
mod tests;

use smallvec::SmallVec;

use crate::foundation::error::{AuraError, AuraResult};

/// Halo bands of one frame; at most three, never heap-allocated.
pub type HaloBands = SmallVec<[HaloBand; 3]>;

/// One fully computed animation state. Recomputed every tick, never persisted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationFrame {
    /// Loop-local time in `[0, 8)` seconds.
    pub t: f64,
    /// `t / 8`, in `[0, 1)`.
    pub loop_progress: f64,
    /// Ambient glow rings.
    pub halo: HaloFrame,
    /// Star anchor layers.
    pub stars: StarsFrame,
    /// Radar polygon motion.
    pub radar: RadarFrame,
    /// Message text envelope.
    pub message: MessageFrame,
    /// Intensity-bucket multiplier, `[0, 2]`.
    pub global_intensity: f64,
    /// Whether this frame is the frozen reduced-motion frame.
    pub reduce_motion: bool,
}

/// Halo layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HaloFrame {
    /// Bands ordered innermost first.
    pub bands: HaloBands,
}

/// One concentric halo ring.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HaloBand {
    /// `[0, 1]`.
    pub intensity: f64,
    /// `[0, 360)`.
    pub rotation_deg: f64,
    /// `[0.5, 1]`, `1 - 0.25 * index`.
    pub layer_opacity: f64,
}

/// Both star depth planes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StarsFrame {
    /// Near plane.
    pub foreground: StarLayer,
    /// Far plane: half the rate and 0.6x the amplitude of the near plane.
    pub background: StarLayer,
}

/// One star depth plane.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StarLayer {
    /// `[0, 1]`.
    pub twinkle: f64,
    /// `[-1, 1]`.
    pub drift_x: f64,
    /// `[-1, 1]`.
    pub drift_y: f64,
    /// `[0.8, 1.2]`.
    pub scale: f64,
}

/// Radar polygon layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RadarFrame {
    /// `[0, 1]`, rest value `0.5`.
    pub wobble: f64,
    /// `[0, 0.1]`, follows the breathing curve.
    pub pulse: f64,
    /// `[1.5, 2.0)`, constant per seed.
    pub secondary_wobble_freq: f64,
    /// `[0, 1)`, position within the breathing cycle.
    pub breathing_phase: f64,
}

/// Message text layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MessageFrame {
    /// `[0, 1]`.
    pub opacity: f64,
    /// `[0.96, 1.04]`.
    pub scale: f64,
    /// `[0, 1]`.
    pub glow_intensity: f64,
}

/// Closed interval with an optionally open upper end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldRange {
    /// Inclusive lower bound.
    pub lo: f64,
    /// Upper bound.
    pub hi: f64,
    /// Whether `hi` itself is excluded.
    pub hi_open: bool,
}

impl FieldRange {
    const fn closed(lo: f64, hi: f64) -> Self {
        Self {
            lo,
            hi,
            hi_open: false,
        }
    }

    const fn half_open(lo: f64, hi: f64) -> Self {
        Self {
            lo,
            hi,
            hi_open: true,
        }
    }

    /// Whether `v` lies in the interval. NaN never does.
    pub fn contains(self, v: f64) -> bool {
        if v.is_nan() || v < self.lo {
            return false;
        }
        if self.hi_open { v < self.hi } else { v <= self.hi }
    }
}

/// Documented intervals of every numeric frame field.
pub mod ranges {
    use super::FieldRange;
    use crate::foundation::core::LOOP_DURATION_SECS;

    /// `t`.
    pub const TIME: FieldRange = FieldRange::half_open(0.0, LOOP_DURATION_SECS);
    /// `loop_progress`, `breathing_phase`.
    pub const UNIT_HALF_OPEN: FieldRange = FieldRange::half_open(0.0, 1.0);
    /// Intensities, opacities, twinkle, wobble, glow.
    pub const UNIT: FieldRange = FieldRange::closed(0.0, 1.0);
    /// Band rotation.
    pub const ROTATION_DEG: FieldRange = FieldRange::half_open(0.0, 360.0);
    /// Band layer opacity.
    pub const LAYER_OPACITY: FieldRange = FieldRange::closed(0.5, 1.0);
    /// Star drift.
    pub const DRIFT: FieldRange = FieldRange::closed(-1.0, 1.0);
    /// Star scale.
    pub const STAR_SCALE: FieldRange = FieldRange::closed(0.8, 1.2);
    /// Radar pulse.
    pub const PULSE: FieldRange = FieldRange::closed(0.0, 0.1);
    /// Radar secondary wobble frequency.
    pub const SECONDARY_WOBBLE: FieldRange = FieldRange::half_open(1.5, 2.0);
    /// Message scale.
    pub const MESSAGE_SCALE: FieldRange = FieldRange::closed(0.96, 1.04);
    /// Global intensity.
    pub const GLOBAL_INTENSITY: FieldRange = FieldRange::closed(0.0, 2.0);
}

impl AnimationFrame {
    /// Report the first field outside its documented interval.
    pub fn check_bounds(&self) -> AuraResult<()> {
        fn check(name: &str, v: f64, r: FieldRange) -> AuraResult<()> {
            if r.contains(v) {
                Ok(())
            } else {
                Err(AuraError::evaluation(format!(
                    "{name} = {v} outside [{}, {}{}",
                    r.lo,
                    r.hi,
                    if r.hi_open { ")" } else { "]" }
                )))
            }
        }

        check("t", self.t, ranges::TIME)?;
        check("loop_progress", self.loop_progress, ranges::UNIT_HALF_OPEN)?;

        let n = self.halo.bands.len();
        if n == 0 || n > 3 {
            return Err(AuraError::evaluation(format!(
                "halo band count {n} outside [1, 3]"
            )));
        }
        for (i, b) in self.halo.bands.iter().enumerate() {
            check(&format!("halo.bands[{i}].intensity"), b.intensity, ranges::UNIT)?;
            check(
                &format!("halo.bands[{i}].rotation_deg"),
                b.rotation_deg,
                ranges::ROTATION_DEG,
            )?;
            check(
                &format!("halo.bands[{i}].layer_opacity"),
                b.layer_opacity,
                ranges::LAYER_OPACITY,
            )?;
        }

        for (name, s) in [
            ("foreground", &self.stars.foreground),
            ("background", &self.stars.background),
        ] {
            check(&format!("stars.{name}.twinkle"), s.twinkle, ranges::UNIT)?;
            check(&format!("stars.{name}.drift_x"), s.drift_x, ranges::DRIFT)?;
            check(&format!("stars.{name}.drift_y"), s.drift_y, ranges::DRIFT)?;
            check(&format!("stars.{name}.scale"), s.scale, ranges::STAR_SCALE)?;
        }

        check("radar.wobble", self.radar.wobble, ranges::UNIT)?;
        check("radar.pulse", self.radar.pulse, ranges::PULSE)?;
        check(
            "radar.secondary_wobble_freq",
            self.radar.secondary_wobble_freq,
            ranges::SECONDARY_WOBBLE,
        )?;
        check(
            "radar.breathing_phase",
            self.radar.breathing_phase,
            ranges::UNIT_HALF_OPEN,
        )?;

        check("message.opacity", self.message.opacity, ranges::UNIT)?;
        check("message.scale", self.message.scale, ranges::MESSAGE_SCALE)?;
        check(
            "message.glow_intensity",
            self.message.glow_intensity,
            ranges::UNIT,
        )?;

        check(
            "global_intensity",
            self.global_intensity,
            ranges::GLOBAL_INTENSITY,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/frame.rs"]
mod tests;

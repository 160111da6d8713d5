use std::f64::consts::PI;

use crate::animation::ease::Ease;
use crate::foundation::math::{clamp_range, clamp01, lerp, wrap_deg};
use crate::interp::blend::{LayerProgress, blend_layers};
use crate::phase::choreography::ChoreographyDescriptor;
use crate::phase::context::AnimationContext;
use crate::phase::registry::PhaseId;
use crate::timeline::frame::{AnimationFrame, StarLayer};

/// Default blend length between two phases.
pub const DEFAULT_TRANSITION_MS: f64 = 350.0;

/// An in-flight blend from one phase's context to another's.
///
/// Time only moves through [`PhaseTransition::advance`]; the transition never reads a clock.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseTransition {
    from: PhaseId,
    to: PhaseId,
    from_context: AnimationContext,
    to_context: AnimationContext,
    choreography: ChoreographyDescriptor,
    duration_ms: f64,
    elapsed_ms: f64,
}

impl PhaseTransition {
    /// Start a transition at zero elapsed time.
    ///
    /// A non-finite or non-positive `duration_ms` makes every layer except the delayed message
    /// jump straight to the incoming phase.
    pub fn new(
        from: PhaseId,
        to: PhaseId,
        from_context: AnimationContext,
        to_context: AnimationContext,
        choreography: ChoreographyDescriptor,
        duration_ms: f64,
    ) -> Self {
        let duration_ms = if duration_ms.is_finite() && duration_ms > 0.0 {
            duration_ms
        } else {
            0.0
        };
        Self {
            from,
            to,
            from_context,
            to_context,
            choreography,
            duration_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Outgoing phase.
    pub fn from(&self) -> PhaseId {
        self.from
    }

    /// Incoming phase.
    pub fn to(&self) -> PhaseId {
        self.to
    }

    /// Choreography driving this transition.
    pub fn choreography(&self) -> &ChoreographyDescriptor {
        &self.choreography
    }

    /// Milliseconds advanced so far.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Move forward by `delta_ms`. Negative and non-finite deltas are ignored.
    pub fn advance(&mut self, delta_ms: f64) {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.elapsed_ms += delta_ms;
        }
    }

    /// Time until every layer has settled: the base duration or the message delay plus fade,
    /// whichever ends later.
    pub fn total_ms(&self) -> f64 {
        self.duration_ms
            .max(self.choreography.message_delay_ms + self.choreography.label_fade_ms)
    }

    /// Whether every layer has reached the incoming phase.
    pub fn is_complete(&self) -> bool {
        self.elapsed_ms >= self.total_ms()
    }

    /// Eased per-layer progress at the current elapsed time.
    pub fn progress(&self) -> LayerProgress {
        let raw = if self.duration_ms > 0.0 {
            clamp01(self.elapsed_ms / self.duration_ms)
        } else {
            1.0
        };
        let base = Ease::OutCubic.apply(raw);
        let c = &self.choreography;
        let message = if c.label_fade_ms <= 0.0 {
            if self.elapsed_ms >= c.message_delay_ms { 1.0 } else { 0.0 }
        } else {
            Ease::InOutSine.apply(clamp01(
                (self.elapsed_ms - c.message_delay_ms) / c.label_fade_ms,
            ))
        };
        LayerProgress {
            frame: base,
            halo: base,
            stars: base,
            radar: c.polygon_easing_curve.apply(raw),
            message,
        }
    }

    /// Context currently on screen, blended by the base progress.
    pub fn current_context(&self) -> AnimationContext {
        self.from_context.lerp(&self.to_context, self.progress().frame)
    }

    /// Compose the displayed frame from one engine frame.
    ///
    /// Both phase contexts are applied to `base` and blended per layer. The choreography's halo
    /// swing and star drift gain peak mid-transition and vanish at both ends.
    pub fn compose(&self, base: &AnimationFrame) -> AnimationFrame {
        if base.reduce_motion {
            return base.clone();
        }
        let p = self.progress();
        let a = self.from_context.apply(base.clone());
        let b = self.to_context.apply(base.clone());
        let mut out = blend_layers(&a, &b, p);

        let halo_swing = swing(p.halo);
        if halo_swing != 0.0 {
            let delta = self.choreography.halo_rotation_delta * halo_swing;
            for band in out.halo.bands.iter_mut() {
                band.rotation_deg = wrap_deg(band.rotation_deg + delta);
            }
        }

        let star_swing = swing(p.stars);
        if star_swing != 0.0 {
            let gain = lerp(1.0, self.choreography.star_drift_multiplier, star_swing);
            scale_drift(&mut out.stars.foreground, gain);
            scale_drift(&mut out.stars.background, gain);
        }
        out
    }
}

/// `sin(pi * p)` strictly inside `(0, 1)`, exactly `0` outside.
fn swing(p: f64) -> f64 {
    if p > 0.0 && p < 1.0 {
        (PI * p).sin()
    } else {
        0.0
    }
}

fn scale_drift(layer: &mut StarLayer, gain: f64) {
    layer.drift_x = clamp_range(layer.drift_x * gain, -1.0, 1.0);
    layer.drift_y = clamp_range(layer.drift_y * gain, -1.0, 1.0);
}

#[cfg(test)]
#[path = "../../tests/unit/interp/transition.rs"]
mod tests;

use std::collections::BTreeMap;

use crate::animation::ease::Ease;
use crate::foundation::error::{AuraError, AuraResult};
use crate::phase::registry::PhaseId;

/// How one phase hands over to the next.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChoreographyDescriptor {
    /// Peak extra halo swing in degrees, reached mid-transition.
    pub halo_rotation_delta: f64,
    /// Easing applied to radar progress.
    pub polygon_easing_curve: Ease,
    /// Message fade length.
    pub label_fade_ms: f64,
    /// Wait before the message fade starts.
    pub message_delay_ms: f64,
    /// Peak star drift gain, reached mid-transition.
    pub star_drift_multiplier: f64,
}

impl ChoreographyDescriptor {
    /// Used for every pair without an explicit entry.
    pub const DEFAULT: Self = Self {
        halo_rotation_delta: 0.0,
        polygon_easing_curve: Ease::OutCubic,
        label_fade_ms: 250.0,
        message_delay_ms: 0.0,
        star_drift_multiplier: 1.0,
    };

    const fn new(
        halo_rotation_delta: f64,
        polygon_easing_curve: Ease,
        label_fade_ms: f64,
        message_delay_ms: f64,
        star_drift_multiplier: f64,
    ) -> Self {
        Self {
            halo_rotation_delta,
            polygon_easing_curve,
            label_fade_ms,
            message_delay_ms,
            star_drift_multiplier,
        }
    }

    fn validate(&self, from: PhaseId, to: PhaseId) -> AuraResult<()> {
        let ok = self.halo_rotation_delta.is_finite()
            && self.label_fade_ms.is_finite()
            && self.label_fade_ms >= 0.0
            && self.message_delay_ms.is_finite()
            && self.message_delay_ms >= 0.0
            && self.star_drift_multiplier.is_finite()
            && self.star_drift_multiplier >= 0.0;
        if ok {
            Ok(())
        } else {
            Err(AuraError::config(format!(
                "choreography {from} -> {to}: timings and multiplier must be finite and >= 0"
            )))
        }
    }
}

impl Default for ChoreographyDescriptor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One choreography entry, as loaded from JSON.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChoreographyEntry {
    /// Outgoing phase.
    pub from: PhaseId,
    /// Incoming phase.
    pub to: PhaseId,
    /// Descriptor for this pair.
    #[serde(flatten)]
    pub descriptor: ChoreographyDescriptor,
}

/// Sparse `(from, to) -> descriptor` lookup with a total fallback.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoreographyTable {
    entries: BTreeMap<(PhaseId, PhaseId), ChoreographyDescriptor>,
}

impl ChoreographyTable {
    /// Transitions along the narrative order, plus the outro loop back to idle.
    pub fn builtin() -> Self {
        use Ease::*;
        use PhaseId::*;

        let pairs = [
            (Idle, Intro, ChoreographyDescriptor::new(45.0, InOutCubic, 400.0, 150.0, 1.2)),
            (Intro, AxisFocus, ChoreographyDescriptor::new(30.0, OutCubic, 300.0, 100.0, 1.0)),
            (
                AxisFocus,
                StrainSpotlight,
                ChoreographyDescriptor::new(60.0, OutQuad, 250.0, 120.0, 1.4),
            ),
            (
                StrainSpotlight,
                DoseReveal,
                ChoreographyDescriptor::new(90.0, InOutSine, 350.0, 200.0, 1.5),
            ),
            (DoseReveal, Message, ChoreographyDescriptor::new(-30.0, OutSine, 450.0, 250.0, 0.8)),
            (Message, Outro, ChoreographyDescriptor::new(-45.0, InOutQuad, 500.0, 300.0, 0.6)),
            (Outro, Idle, ChoreographyDescriptor::new(0.0, Linear, 250.0, 0.0, 1.0)),
        ];
        Self {
            entries: pairs.into_iter().map(|(f, t, d)| ((f, t), d)).collect(),
        }
    }

    /// Table without entries; every pair resolves to [`ChoreographyDescriptor::DEFAULT`].
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build from explicit entries. A pair listed twice is a configuration error.
    pub fn new(entries: impl IntoIterator<Item = ChoreographyEntry>) -> AuraResult<Self> {
        let mut map = BTreeMap::new();
        for e in entries {
            e.descriptor.validate(e.from, e.to)?;
            if map.insert((e.from, e.to), e.descriptor).is_some() {
                return Err(AuraError::config(format!(
                    "duplicate choreography {} -> {}",
                    e.from, e.to
                )));
            }
        }
        Ok(Self { entries: map })
    }

    /// Decode a JSON array of [`ChoreographyEntry`].
    pub fn from_json(json: &str) -> AuraResult<Self> {
        let entries: Vec<ChoreographyEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Descriptor for `from -> to`. Never fails.
    pub fn resolve(&self, from: PhaseId, to: PhaseId) -> ChoreographyDescriptor {
        match self.entries.get(&(from, to)) {
            Some(d) => *d,
            None => {
                tracing::trace!(%from, %to, "no choreography entry, using default");
                ChoreographyDescriptor::DEFAULT
            }
        }
    }

    /// Whether `from -> to` has an explicit entry.
    pub fn contains(&self, from: PhaseId, to: PhaseId) -> bool {
        self.entries.contains_key(&(from, to))
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ChoreographyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/phase/choreography.rs"]
mod tests;

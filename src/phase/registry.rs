use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{AuraError, AuraResult};
use crate::phase::context::AnimationContext;

/// Closed set of narrative phases.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PhaseId {
    /// Resting state before a selection is presented.
    Idle,
    /// Opening sweep with the welcome message.
    Intro,
    /// One radar axis is highlighted.
    AxisFocus,
    /// The selected strain is highlighted.
    StrainSpotlight,
    /// The intensity bucket is revealed.
    DoseReveal,
    /// Message text is the focus.
    Message,
    /// Closing fade.
    Outro,
}

impl PhaseId {
    /// Every phase, in narrative order.
    pub const ALL: [PhaseId; 7] = [
        PhaseId::Idle,
        PhaseId::Intro,
        PhaseId::AxisFocus,
        PhaseId::StrainSpotlight,
        PhaseId::DoseReveal,
        PhaseId::Message,
        PhaseId::Outro,
    ];

    /// Canonical snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Intro => "intro",
            Self::AxisFocus => "axis_focus",
            Self::StrainSpotlight => "strain_spotlight",
            Self::DoseReveal => "dose_reveal",
            Self::Message => "message",
            Self::Outro => "outro",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseId {
    type Err = AuraError;

    fn from_str(s: &str) -> AuraResult<Self> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == key)
            .ok_or_else(|| AuraError::config(format!("unknown phase '{}'", s.trim())))
    }
}

/// Static attributes of one phase.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhaseDescriptor {
    /// Phase this descriptor belongs to.
    pub id: PhaseId,
    /// Radar axis to highlight, if any.
    #[serde(default)]
    pub highlight_axis: Option<String>,
    /// Strain to highlight, if any.
    #[serde(default)]
    pub highlight_strain: Option<String>,
    /// Message copy key, if any.
    #[serde(default)]
    pub message_id: Option<String>,
    /// Star arrangement preset, if any.
    #[serde(default)]
    pub star_preset_id: Option<String>,
    /// Added to every halo band rotation.
    pub halo_rotation_bias_deg: f64,
    /// Radar energy bias, `[-1, 1]`.
    pub polygon_energy_bias: f64,
    /// Star twinkle/scale emphasis, `[0, 2]`; `1` is neutral.
    pub star_emphasis: f64,
}

impl PhaseDescriptor {
    fn bare(id: PhaseId, rotation: f64, energy: f64, emphasis: f64) -> Self {
        Self {
            id,
            highlight_axis: None,
            highlight_strain: None,
            message_id: None,
            star_preset_id: None,
            halo_rotation_bias_deg: rotation,
            polygon_energy_bias: energy,
            star_emphasis: emphasis,
        }
    }

    /// Bias values handed to the frame composer.
    pub fn animation_context(&self) -> AnimationContext {
        AnimationContext {
            halo_rotation_bias_deg: self.halo_rotation_bias_deg,
            polygon_energy_bias: self.polygon_energy_bias,
            star_emphasis: self.star_emphasis,
        }
    }

    fn validate(&self) -> AuraResult<()> {
        let id = self.id;
        if !self.halo_rotation_bias_deg.is_finite() {
            return Err(AuraError::config(format!(
                "phase '{id}': halo_rotation_bias_deg must be finite"
            )));
        }
        if !(-1.0..=1.0).contains(&self.polygon_energy_bias) {
            return Err(AuraError::config(format!(
                "phase '{id}': polygon_energy_bias must be in [-1, 1], got {}",
                self.polygon_energy_bias
            )));
        }
        if !(0.0..=2.0).contains(&self.star_emphasis) {
            return Err(AuraError::config(format!(
                "phase '{id}': star_emphasis must be in [0, 2], got {}",
                self.star_emphasis
            )));
        }
        Ok(())
    }
}

/// One descriptor per [`PhaseId`], immutable after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseRegistry {
    descriptors: Vec<PhaseDescriptor>,
}

impl PhaseRegistry {
    /// Phases shipped with the crate.
    pub fn builtin() -> Self {
        let intro = PhaseDescriptor {
            message_id: Some("welcome".to_owned()),
            star_preset_id: Some("constellation".to_owned()),
            ..PhaseDescriptor::bare(PhaseId::Intro, 0.0, -0.2, 0.8)
        };
        let axis_focus = PhaseDescriptor {
            highlight_axis: Some("energy".to_owned()),
            ..PhaseDescriptor::bare(PhaseId::AxisFocus, 30.0, 0.2, 1.1)
        };
        let strain_spotlight = PhaseDescriptor {
            highlight_strain: Some("selected".to_owned()),
            star_preset_id: Some("spotlight".to_owned()),
            ..PhaseDescriptor::bare(PhaseId::StrainSpotlight, 60.0, 0.3, 1.3)
        };
        let dose_reveal = PhaseDescriptor {
            highlight_axis: Some("intensity".to_owned()),
            message_id: Some("dose".to_owned()),
            ..PhaseDescriptor::bare(PhaseId::DoseReveal, 90.0, 0.5, 1.2)
        };
        let message = PhaseDescriptor {
            message_id: Some("affirmation".to_owned()),
            ..PhaseDescriptor::bare(PhaseId::Message, 0.0, -0.1, 0.9)
        };
        let outro = PhaseDescriptor {
            message_id: Some("farewell".to_owned()),
            star_preset_id: Some("scatter".to_owned()),
            ..PhaseDescriptor::bare(PhaseId::Outro, -30.0, -0.4, 0.6)
        };
        Self {
            descriptors: vec![
                PhaseDescriptor::bare(PhaseId::Idle, 0.0, 0.0, 1.0),
                intro,
                axis_focus,
                strain_spotlight,
                dose_reveal,
                message,
                outro,
            ],
        }
    }

    /// Build from explicit descriptors; each phase must appear exactly once.
    pub fn new(descriptors: impl IntoIterator<Item = PhaseDescriptor>) -> AuraResult<Self> {
        let mut slots: Vec<Option<PhaseDescriptor>> = vec![None; PhaseId::ALL.len()];
        for d in descriptors {
            d.validate()?;
            let slot = &mut slots[d.id.index()];
            if slot.is_some() {
                return Err(AuraError::config(format!(
                    "duplicate descriptor for phase '{}'",
                    d.id
                )));
            }
            *slot = Some(d);
        }
        let descriptors = PhaseId::ALL
            .into_iter()
            .zip(slots)
            .map(|(id, d)| {
                d.ok_or_else(|| AuraError::config(format!("missing descriptor for phase '{id}'")))
            })
            .collect::<AuraResult<Vec<_>>>()?;
        Ok(Self { descriptors })
    }

    /// Decode a JSON array of descriptors.
    pub fn from_json(json: &str) -> AuraResult<Self> {
        let descriptors: Vec<PhaseDescriptor> = serde_json::from_str(json)?;
        Self::new(descriptors)
    }

    /// Descriptor for `id`.
    pub fn get(&self, id: PhaseId) -> &PhaseDescriptor {
        &self.descriptors[id.index()]
    }

    /// All descriptors in [`PhaseId::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &PhaseDescriptor> {
        self.descriptors.iter()
    }
}

impl Default for PhaseRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/phase/registry.rs"]
mod tests;

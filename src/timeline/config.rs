use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{AuraError, AuraResult};
use crate::profile::tables::{EffectCategory, IntensityBucket};

/// Per-selection engine input. Built once per selection and never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimelineConfig {
    /// Selects the motion profile.
    pub category: EffectCategory,
    /// Selects the amplitude multiplier.
    pub intensity: IntensityBucket,
    /// Stable identity of the selection; any value is accepted.
    pub seed: i64,
    /// Host accessibility preference; freezes the animation when set.
    #[serde(default)]
    pub reduce_motion: bool,
}

impl TimelineConfig {
    /// Typed constructor.
    pub fn new(
        category: EffectCategory,
        intensity: IntensityBucket,
        seed: i64,
        reduce_motion: bool,
    ) -> Self {
        Self {
            category,
            intensity,
            seed,
            reduce_motion,
        }
    }

    /// Build from the names an external selection resolver hands over.
    ///
    /// Unknown names are configuration errors; nothing is defaulted.
    pub fn parse(
        category: &str,
        intensity: &str,
        seed: i64,
        reduce_motion: bool,
    ) -> AuraResult<Self> {
        Ok(Self::new(
            category.parse()?,
            intensity.parse()?,
            seed,
            reduce_motion,
        ))
    }

    /// Decode from JSON, e.g. `{"category":"social","intensity":"low","seed":7}`.
    #[tracing::instrument(skip(json))]
    pub fn from_json(json: &str) -> AuraResult<Self> {
        serde_json::from_str(json).map_err(|e| AuraError::config(e.to_string()))
    }

    /// Read and decode a JSON config file.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> AuraResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read timeline config '{}'", path.display()))?;
        Self::from_json(&s)
    }

    /// Same selection with the reduced-motion flag replaced.
    pub fn with_reduce_motion(self, reduce_motion: bool) -> Self {
        Self {
            reduce_motion,
            ..self
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/config.rs"]
mod tests;

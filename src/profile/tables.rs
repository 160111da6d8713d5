use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{AuraError, AuraResult};

/// Closed set of effect categories a selection resolves to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EffectCategory {
    /// Fast, bright, three-band motion.
    Energetic,
    /// Slow single-band motion.
    Introspective,
    /// Lively, mid-speed motion.
    Social,
    /// Slow, glow-heavy motion.
    Spiritual,
    /// Neutral mid-range motion.
    Balanced,
}

impl EffectCategory {
    /// Every category, in table order.
    pub const ALL: [EffectCategory; 5] = [
        EffectCategory::Energetic,
        EffectCategory::Introspective,
        EffectCategory::Social,
        EffectCategory::Spiritual,
        EffectCategory::Balanced,
    ];

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Energetic => "energetic",
            Self::Introspective => "introspective",
            Self::Social => "social",
            Self::Spiritual => "spiritual",
            Self::Balanced => "balanced",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EffectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectCategory {
    type Err = AuraError;

    fn from_str(s: &str) -> AuraResult<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| AuraError::config(format!("unknown effect category '{}'", s.trim())))
    }
}

/// Coarse potency classification, ordered from weakest to strongest.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IntensityBucket {
    /// Smallest bucket.
    Micro,
    /// Low bucket.
    Low,
    /// Medium bucket.
    Medium,
    /// High bucket.
    High,
    /// Largest bucket.
    Heroic,
}

impl IntensityBucket {
    /// Every bucket, weakest first.
    pub const ALL: [IntensityBucket; 5] = [
        IntensityBucket::Micro,
        IntensityBucket::Low,
        IntensityBucket::Medium,
        IntensityBucket::High,
        IntensityBucket::Heroic,
    ];

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Micro => "micro",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Heroic => "heroic",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for IntensityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntensityBucket {
    type Err = AuraError;

    fn from_str(s: &str) -> AuraResult<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == key)
            .ok_or_else(|| AuraError::config(format!("unknown intensity bucket '{}'", s.trim())))
    }
}

/// Per-category animation parameters. Rates are in Hz.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionProfile {
    /// Halo speed factor (rotation `speed * 45` deg/s, intensity wave `speed / 2` Hz).
    pub halo_speed: f64,
    /// Concentric halo bands, `1..=3`.
    pub halo_band_count: u8,
    /// Foreground star twinkle rate.
    pub star_twinkle_rate: f64,
    /// Foreground star drift amplitude, `[0, 1]`.
    pub star_drift_amplitude: f64,
    /// Radar polygon wobble strength, `[0, 1]`.
    pub radar_wobble_strength: f64,
    /// Breathing cycles per second.
    pub breathing_rate: f64,
    /// Message glow strength, `[0, 1]`.
    pub message_glow_strength: f64,
}

impl MotionProfile {
    /// Largest supported band count.
    pub const MAX_BANDS: u8 = 3;

    fn validate(&self, category: EffectCategory) -> AuraResult<()> {
        if !(1..=Self::MAX_BANDS).contains(&self.halo_band_count) {
            return Err(AuraError::config(format!(
                "profile '{category}': halo_band_count must be in 1..=3, got {}",
                self.halo_band_count
            )));
        }
        let fields = [
            ("halo_speed", self.halo_speed),
            ("star_twinkle_rate", self.star_twinkle_rate),
            ("star_drift_amplitude", self.star_drift_amplitude),
            ("radar_wobble_strength", self.radar_wobble_strength),
            ("breathing_rate", self.breathing_rate),
            ("message_glow_strength", self.message_glow_strength),
        ];
        for (name, v) in fields {
            if !v.is_finite() || v < 0.0 {
                return Err(AuraError::config(format!(
                    "profile '{category}': {name} must be finite and >= 0, got {v}"
                )));
            }
        }
        for (name, v) in [
            ("star_drift_amplitude", self.star_drift_amplitude),
            ("radar_wobble_strength", self.radar_wobble_strength),
            ("message_glow_strength", self.message_glow_strength),
        ] {
            if v > 1.0 {
                return Err(AuraError::config(format!(
                    "profile '{category}': {name} must be <= 1, got {v}"
                )));
            }
        }
        Ok(())
    }
}

const BUILTIN_PROFILES: [MotionProfile; 5] = [
    // energetic
    MotionProfile {
        halo_speed: 2.0,
        halo_band_count: 3,
        star_twinkle_rate: 1.0,
        star_drift_amplitude: 0.8,
        radar_wobble_strength: 0.9,
        breathing_rate: 0.5,
        message_glow_strength: 0.9,
    },
    // introspective
    MotionProfile {
        halo_speed: 0.5,
        halo_band_count: 1,
        star_twinkle_rate: 0.25,
        star_drift_amplitude: 0.35,
        radar_wobble_strength: 0.3,
        breathing_rate: 0.125,
        message_glow_strength: 0.6,
    },
    // social
    MotionProfile {
        halo_speed: 1.5,
        halo_band_count: 2,
        star_twinkle_rate: 0.75,
        star_drift_amplitude: 0.6,
        radar_wobble_strength: 0.6,
        breathing_rate: 0.25,
        message_glow_strength: 0.8,
    },
    // spiritual
    MotionProfile {
        halo_speed: 0.75,
        halo_band_count: 2,
        star_twinkle_rate: 0.5,
        star_drift_amplitude: 0.45,
        radar_wobble_strength: 0.4,
        breathing_rate: 0.125,
        message_glow_strength: 1.0,
    },
    // balanced
    MotionProfile {
        halo_speed: 1.0,
        halo_band_count: 2,
        star_twinkle_rate: 0.5,
        star_drift_amplitude: 0.5,
        radar_wobble_strength: 0.5,
        breathing_rate: 0.25,
        message_glow_strength: 0.7,
    },
];

const BUILTIN_MULTIPLIERS: [f64; 5] = [0.4, 0.6, 0.8, 1.0, 1.3];

/// Immutable category/intensity lookups, built once and shared by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionTables {
    profiles: [MotionProfile; 5],
    multipliers: [f64; 5],
}

impl MotionTables {
    /// Largest accepted intensity multiplier.
    pub const MAX_MULTIPLIER: f64 = 2.0;

    /// Tables shipped with the crate.
    pub fn builtin() -> Self {
        Self {
            profiles: BUILTIN_PROFILES,
            multipliers: BUILTIN_MULTIPLIERS,
        }
    }

    /// Build tables from explicit entries.
    ///
    /// Every category and bucket must appear exactly once; multipliers must lie in `[0, 2]` and
    /// be non-decreasing from `micro` to `heroic`.
    pub fn new(
        profiles: impl IntoIterator<Item = (EffectCategory, MotionProfile)>,
        multipliers: impl IntoIterator<Item = (IntensityBucket, f64)>,
    ) -> AuraResult<Self> {
        let mut p: [Option<MotionProfile>; 5] = [None; 5];
        for (cat, profile) in profiles {
            let slot = &mut p[cat.index()];
            if slot.is_some() {
                return Err(AuraError::config(format!("duplicate profile for '{cat}'")));
            }
            *slot = Some(profile);
        }
        let mut m: [Option<f64>; 5] = [None; 5];
        for (bucket, mul) in multipliers {
            let slot = &mut m[bucket.index()];
            if slot.is_some() {
                return Err(AuraError::config(format!(
                    "duplicate multiplier for '{bucket}'"
                )));
            }
            *slot = Some(mul);
        }

        let mut out = Self::builtin();
        for cat in EffectCategory::ALL {
            out.profiles[cat.index()] = p[cat.index()]
                .ok_or_else(|| AuraError::config(format!("missing profile for '{cat}'")))?;
        }
        for bucket in IntensityBucket::ALL {
            out.multipliers[bucket.index()] = m[bucket.index()]
                .ok_or_else(|| AuraError::config(format!("missing multiplier for '{bucket}'")))?;
        }
        out.validate()?;
        Ok(out)
    }

    /// Check every profile and the multiplier ordering.
    pub fn validate(&self) -> AuraResult<()> {
        for cat in EffectCategory::ALL {
            self.profile(cat).validate(cat)?;
        }
        let mut prev = 0.0;
        for bucket in IntensityBucket::ALL {
            let v = self.multiplier(bucket);
            if !v.is_finite() || !(0.0..=Self::MAX_MULTIPLIER).contains(&v) {
                return Err(AuraError::config(format!(
                    "multiplier for '{bucket}' must be in [0, 2], got {v}"
                )));
            }
            if v < prev {
                return Err(AuraError::config(format!(
                    "multiplier for '{bucket}' ({v}) is below the previous bucket ({prev})"
                )));
            }
            prev = v;
        }
        Ok(())
    }

    /// Motion parameters for `category`.
    pub fn profile(&self, category: EffectCategory) -> &MotionProfile {
        &self.profiles[category.index()]
    }

    /// Global amplitude multiplier for `bucket`.
    pub fn multiplier(&self, bucket: IntensityBucket) -> f64 {
        self.multipliers[bucket.index()]
    }
}

impl Default for MotionTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/profile/tables.rs"]
mod tests;

//! Seeded per-layer signatures.
//!
//! Each visual layer derives a stable offset from `(seed, salt)` so simultaneous layers of one
//! instance do not move in lockstep, and two selections do not animate identically.

/// Salts reserved for engine layers. Halo bands use their index (`0..3`) directly.
pub(crate) mod salt {
    pub(crate) const STAR_FOREGROUND: u64 = 0x10;
    pub(crate) const STAR_BACKGROUND: u64 = 0x11;
    pub(crate) const STAR_DRIFT_PHASE: u64 = 0x12;
    pub(crate) const RADAR_WOBBLE: u64 = 0x20;
    pub(crate) const RADAR_SECONDARY: u64 = 0x21;
    pub(crate) const RADAR_BREATH: u64 = 0x22;
    pub(crate) const MESSAGE: u64 = 0x30;
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub(crate) fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

/// Deterministic `(seed, salt) -> [0, 1)`.
///
/// Total over every integer pair: negative and extreme seeds wrap through their two's-complement
/// bits. Results are identical on every platform since only integer arithmetic precedes the final
/// exact conversion.
pub fn hash_to_float(seed: i64, salt: u64) -> f64 {
    let mut rng = Rng64::new((seed as u64) ^ salt.wrapping_mul(0xD6E8_FEB8_6659_FD93));
    rng.next_f64_01()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/hash.rs"]
mod tests;

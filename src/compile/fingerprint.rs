use xxhash_rust::xxh3::Xxh3;

use crate::timeline::frame::{AnimationFrame, StarLayer};

const XXH3_SEED: u64 = 0x6175_7261_7363_6f70;

/// Stable 128-bit digest of a frame's visible state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameFingerprint {
    /// Upper half.
    pub hi: u64,
    /// Lower half.
    pub lo: u64,
}

impl std::fmt::Display for FrameFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Fingerprint everything a painter would draw from `frame`.
///
/// `t` and `loop_progress` are not hashed, so two frames that look the same compare equal even
/// when taken at different times.
pub fn fingerprint_frame(frame: &AnimationFrame) -> FrameFingerprint {
    let mut h = StableHasher::new();
    write_frame(&mut h, frame);
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn finish(self) -> FrameFingerprint {
        let v = self.inner.digest128();
        FrameFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_frame(h: &mut StableHasher, f: &AnimationFrame) {
    h.write_u8(f.halo.bands.len() as u8);
    for b in &f.halo.bands {
        h.write_f64(b.intensity);
        h.write_f64(b.rotation_deg);
        h.write_f64(b.layer_opacity);
    }

    write_star_layer(h, &f.stars.foreground);
    write_star_layer(h, &f.stars.background);

    h.write_f64(f.radar.wobble);
    h.write_f64(f.radar.pulse);
    h.write_f64(f.radar.secondary_wobble_freq);
    h.write_f64(f.radar.breathing_phase);

    h.write_f64(f.message.opacity);
    h.write_f64(f.message.scale);
    h.write_f64(f.message.glow_intensity);

    h.write_f64(f.global_intensity);
    h.write_bool(f.reduce_motion);
}

fn write_star_layer(h: &mut StableHasher, s: &StarLayer) {
    h.write_f64(s.twinkle);
    h.write_f64(s.drift_x);
    h.write_f64(s.drift_y);
    h.write_f64(s.scale);
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;

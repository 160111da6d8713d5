pub(crate) fn clamp01(v: f64) -> f64 {
    clamp_range(v, 0.0, 1.0)
}

/// Clamp that maps NaN to `lo` instead of propagating it.
pub(crate) fn clamp_range(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

/// `a * (1 - t) + b * t`; exact at both endpoints.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

pub(crate) fn wrap_deg(deg: f64) -> f64 {
    let w = deg.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs.
    if w >= 360.0 { 0.0 } else { w }
}

/// Blend two angles along the shortest arc, result wrapped to `[0, 360)`.
pub(crate) fn lerp_deg(a: f64, b: f64, t: f64) -> f64 {
    let mut d = (b - a).rem_euclid(360.0);
    if d > 180.0 {
        d -= 360.0;
    }
    wrap_deg(a + d * t)
}

/// Blend two values on a circle of circumference `period`, result in `[0, period)`.
pub(crate) fn lerp_wrapped(a: f64, b: f64, t: f64, period: f64) -> f64 {
    let mut d = (b - a).rem_euclid(period);
    if d > period * 0.5 {
        d -= period;
    }
    let w = (a + d * t).rem_euclid(period);
    if w >= period { 0.0 } else { w }
}

pub(crate) fn fract(v: f64) -> f64 {
    let f = v - v.floor();
    if f >= 1.0 { 0.0 } else { f }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

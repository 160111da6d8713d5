/// Length of the repeating cycle all frame math is parameterized against.
pub const LOOP_DURATION_SECS: f64 = 8.0;

/// Wrap an arbitrary time into `[0, LOOP_DURATION_SECS)`. Non-finite input maps to `0`.
pub fn wrap_loop_time(t: f64) -> f64 {
    if !t.is_finite() {
        return 0.0;
    }
    let w = t.rem_euclid(LOOP_DURATION_SECS);
    if w >= LOOP_DURATION_SECS { 0.0 } else { w }
}

/// Snap a rate in Hz to a whole number of cycles per loop (at least one).
///
/// Every sinusoidal signal in a frame is driven by an integer cycle count, which keeps
/// `frame(0)` and `frame(LOOP_DURATION_SECS - eps)` continuous.
pub(crate) fn loop_cycles(rate_hz: f64) -> f64 {
    let c = (rate_hz * LOOP_DURATION_SECS).round();
    if c.is_finite() && c >= 1.0 { c } else { 1.0 }
}

/// Angle in radians of `cycles` whole turns per loop at loop-local time `t`.
pub(crate) fn loop_angle(t: f64, cycles: f64) -> f64 {
    std::f64::consts::TAU * cycles * t / LOOP_DURATION_SECS
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

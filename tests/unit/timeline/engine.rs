use super::*;
use crate::profile::tables::{EffectCategory, IntensityBucket};

fn cfg(category: EffectCategory, intensity: IntensityBucket, seed: i64) -> TimelineConfig {
    TimelineConfig::new(category, intensity, seed, false)
}

fn engine(category: EffectCategory, intensity: IntensityBucket, seed: i64) -> TimelineEngine {
    TimelineEngine::new(cfg(category, intensity, seed), &MotionTables::builtin())
}

#[test]
fn energetic_heroic_has_three_stepped_bands() {
    let f = engine(EffectCategory::Energetic, IntensityBucket::Heroic, 42).frame(0.0);
    assert_eq!(f.halo.bands.len(), 3);
    assert_eq!(f.halo.bands[0].layer_opacity, 1.0);
    assert_eq!(f.halo.bands[1].layer_opacity, 0.75);
    assert_eq!(f.halo.bands[2].layer_opacity, 0.5);
}

#[test]
fn band_count_follows_category() {
    let tables = MotionTables::builtin();
    for cat in EffectCategory::ALL {
        let e = engine(cat, IntensityBucket::Medium, 1);
        let expected = usize::from(tables.profile(cat).halo_band_count);
        assert_eq!(e.band_count(), expected);
        for t in [0.0, 1.3, 7.9] {
            assert_eq!(e.frame(t).halo.bands.len(), expected);
        }
    }
}

#[test]
fn frame_is_periodic_exactly() {
    let e = engine(EffectCategory::Energetic, IntensityBucket::Heroic, 42);
    assert_eq!(e.frame(2.0), e.frame(2.0 + LOOP_DURATION_SECS));
    assert_eq!(e.frame(2.0), e.frame(2.0 - 2.0 * LOOP_DURATION_SECS));
}

#[test]
fn non_finite_time_is_treated_as_zero() {
    let e = engine(EffectCategory::Social, IntensityBucket::Low, 3);
    assert_eq!(e.frame(f64::NAN), e.frame(0.0));
    assert_eq!(e.frame(f64::NEG_INFINITY), e.frame(0.0));
}

#[test]
fn compute_frame_matches_engine() {
    let c = cfg(EffectCategory::Spiritual, IntensityBucket::High, -99);
    let tables = MotionTables::builtin();
    assert_eq!(
        compute_frame(3.25, &c, &tables),
        TimelineEngine::new(c, &tables).frame(3.25)
    );
}

#[test]
fn frames_stay_in_bounds_on_a_dense_grid() {
    for cat in EffectCategory::ALL {
        for bucket in IntensityBucket::ALL {
            for seed in [0, 42, -1, i64::MAX] {
                let e = engine(cat, bucket, seed);
                for step in 0..400 {
                    let t = step as f64 * 0.0213 - 0.5;
                    let f = e.frame(t);
                    if let Err(err) = f.check_bounds() {
                        panic!("{cat}/{bucket}/{seed} t={t}: {err}");
                    }
                }
            }
        }
    }
}

#[test]
fn seeds_change_the_signature() {
    let a = engine(EffectCategory::Balanced, IntensityBucket::Medium, 1).frame(1.0);
    let b = engine(EffectCategory::Balanced, IntensityBucket::Medium, 2).frame(1.0);
    assert_ne!(a.halo.bands[0].rotation_deg, b.halo.bands[0].rotation_deg);
    assert_ne!(a.radar.secondary_wobble_freq, b.radar.secondary_wobble_freq);
}

#[test]
fn secondary_wobble_is_static_per_seed() {
    let e = engine(EffectCategory::Social, IntensityBucket::High, 77);
    let f0 = e.frame(0.0).radar.secondary_wobble_freq;
    for t in [0.5, 3.0, 7.75] {
        assert_eq!(e.frame(t).radar.secondary_wobble_freq, f0);
    }
    assert!((1.5..2.0).contains(&f0));
}

#[test]
fn background_stars_move_less_than_foreground() {
    let e = engine(EffectCategory::Energetic, IntensityBucket::High, 5);
    let mut fg: f64 = 0.0;
    let mut bg: f64 = 0.0;
    for step in 0..800 {
        let f = e.frame(step as f64 * 0.01);
        fg = fg.max(f.stars.foreground.drift_x.abs());
        bg = bg.max(f.stars.background.drift_x.abs());
    }
    assert!(bg < fg, "bg={bg} fg={fg}");
    assert!((bg / fg - 0.6).abs() < 0.05, "ratio={}", bg / fg);
}

#[test]
fn breathing_curve_is_asymmetric() {
    assert_eq!(breathing_curve(0.0), 0.0);
    assert!((breathing_curve(0.6) - 1.0).abs() < 1e-12);
    assert!(breathing_curve(0.999_999) < 1e-9);
    // Inhale is slower than exhale: same rise takes longer than the fall.
    assert!((breathing_curve(0.3) - 0.5).abs() < 1e-12);
    assert!((breathing_curve(0.8) - 0.5).abs() < 1e-12);
}

#[test]
fn message_envelope_fades_in_holds_and_fades_out() {
    assert_eq!(message_envelope(0.0), 0.0);
    assert!(message_envelope(0.075) > 0.6 && message_envelope(0.075) < 0.8);
    assert_eq!(message_envelope(0.15), 1.0);
    assert_eq!(message_envelope(0.5), 1.0);
    assert_eq!(message_envelope(0.85), 1.0);
    assert!(message_envelope(0.999) < 0.02);
}

#[test]
fn reduce_motion_engine_is_frozen() {
    let c = cfg(EffectCategory::Energetic, IntensityBucket::Heroic, 42).with_reduce_motion(true);
    let e = TimelineEngine::new(c, &MotionTables::builtin());
    assert!(e.is_frozen());
    let a = e.frame(0.0);
    assert!(a.reduce_motion);
    assert_eq!(a, e.frame(3.7));
    assert_eq!(a, e.frame(-1234.5));
}

#[test]
fn global_intensity_tracks_the_bucket() {
    let tables = MotionTables::builtin();
    for bucket in IntensityBucket::ALL {
        let f = engine(EffectCategory::Balanced, bucket, 0).frame(1.0);
        assert_eq!(f.global_intensity, tables.multiplier(bucket));
    }
}

#[test]
fn halo_rotation_keeps_its_exact_rate() {
    let tables = MotionTables::builtin();
    for cat in EffectCategory::ALL {
        let speed = tables.profile(cat).halo_speed;
        let e = engine(cat, IntensityBucket::Medium, 11);
        let (a, b) = (e.frame(0.0), e.frame(1.0));
        for (x, y) in a.halo.bands.iter().zip(&b.halo.bands) {
            let d = (y.rotation_deg - x.rotation_deg).rem_euclid(360.0);
            assert!((d - speed * 45.0).abs() < 1e-9, "{cat}: {d} deg/s for speed {speed}");
        }
    }
}

/// Sign changes of `v(t) - mid` over one loop, wrapping back to the first sample.
fn crossings(e: &TimelineEngine, mid: f64, v: impl Fn(&AnimationFrame) -> f64) -> usize {
    let above: Vec<bool> = (0..4000)
        .map(|i| v(&e.frame(i as f64 * LOOP_DURATION_SECS / 4000.0)) > mid)
        .collect();
    (0..above.len())
        .filter(|&i| above[i] != above[(i + 1) % above.len()])
        .count()
}

#[test]
fn background_stars_run_at_half_speed() {
    for cat in EffectCategory::ALL {
        let e = engine(cat, IntensityBucket::High, 8);
        let fg_twinkle = crossings(&e, 0.5, |f| f.stars.foreground.twinkle);
        let bg_twinkle = crossings(&e, 0.5, |f| f.stars.background.twinkle);
        let fg_drift = crossings(&e, 0.0, |f| f.stars.foreground.drift_x);
        let bg_drift = crossings(&e, 0.0, |f| f.stars.background.drift_x);
        assert_eq!(fg_twinkle, 2 * bg_twinkle, "{cat} twinkle");
        assert_eq!(fg_drift, 2 * bg_drift, "{cat} drift");
        assert!(bg_drift >= 2, "{cat}");
    }
}

#[test]
fn star_cycles_halve_exactly_for_every_profile() {
    let tables = MotionTables::builtin();
    for cat in EffectCategory::ALL {
        let [fg, bg] = star_cycles(tables.profile(cat).star_twinkle_rate);
        assert_eq!(fg.twinkle, 2.0 * bg.twinkle, "{cat}");
        assert_eq!(fg.drift, 2.0 * bg.drift, "{cat}");
        assert!(bg.drift >= 1.0 && bg.drift.fract() == 0.0, "{cat}");
    }
}

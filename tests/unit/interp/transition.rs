use super::*;
use crate::phase::machine::PhaseMachine;
use crate::profile::tables::{EffectCategory, IntensityBucket, MotionTables};
use crate::timeline::config::TimelineConfig;
use crate::timeline::engine::TimelineEngine;

fn transition(from: PhaseId, to: PhaseId) -> PhaseTransition {
    let m = PhaseMachine::builtin();
    PhaseTransition::new(
        from,
        to,
        m.context_of(from),
        m.context_of(to),
        m.choreography(from, to),
        DEFAULT_TRANSITION_MS,
    )
}

fn base_frame(t: f64) -> AnimationFrame {
    let cfg = TimelineConfig::new(EffectCategory::Energetic, IntensityBucket::High, 42, false);
    TimelineEngine::new(cfg, &MotionTables::builtin()).frame(t)
}

#[test]
fn non_positive_duration_cuts_immediately() {
    let c = ChoreographyDescriptor::DEFAULT;
    let n = AnimationContext::NEUTRAL;
    for d in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let tr = PhaseTransition::new(PhaseId::Idle, PhaseId::Intro, n, n, c, d);
        let p = tr.progress();
        assert_eq!(p.halo, 1.0);
        assert_eq!(p.radar, 1.0);
        assert_eq!(p.message, 0.0);
        assert_eq!(tr.total_ms(), 250.0);
    }
}

#[test]
fn starts_at_outgoing_and_ends_at_incoming() {
    let mut tr = transition(PhaseId::AxisFocus, PhaseId::StrainSpotlight);
    let m = PhaseMachine::builtin();
    let f = base_frame(2.5);

    assert_eq!(tr.compose(&f), m.context_of(PhaseId::AxisFocus).apply(f.clone()));
    tr.advance(tr.total_ms());
    assert!(tr.is_complete());
    assert_eq!(
        tr.compose(&f),
        m.context_of(PhaseId::StrainSpotlight).apply(f.clone())
    );
}

#[test]
fn message_waits_for_its_delay() {
    let mut tr = transition(PhaseId::Idle, PhaseId::Intro);
    assert_eq!(tr.choreography().message_delay_ms, 150.0);
    tr.advance(149.0);
    assert_eq!(tr.progress().message, 0.0);
    assert!(tr.progress().halo > 0.5);
    tr.advance(151.0 + 400.0);
    assert_eq!(tr.progress().message, 1.0);
}

#[test]
fn total_covers_the_message_fade() {
    let tr = transition(PhaseId::Message, PhaseId::Outro);
    assert_eq!(tr.total_ms(), 300.0 + 500.0);
    let tr = transition(PhaseId::Outro, PhaseId::Intro);
    assert_eq!(tr.total_ms(), DEFAULT_TRANSITION_MS);
}

#[test]
fn radar_follows_the_choreography_curve() {
    let mut tr = transition(PhaseId::AxisFocus, PhaseId::StrainSpotlight);
    tr.advance(DEFAULT_TRANSITION_MS * 0.5);
    let p = tr.progress();
    assert_eq!(p.radar, Ease::OutQuad.apply(0.5));
    assert_eq!(p.halo, Ease::OutCubic.apply(0.5));
}

#[test]
fn halo_swing_peaks_mid_transition() {
    let f = base_frame(1.0);
    let mut tr = transition(PhaseId::StrainSpotlight, PhaseId::DoseReveal);
    tr.advance(80.0);
    let p = tr.progress();
    let plain = blend_layers(
        &tr.from_context.apply(f.clone()),
        &tr.to_context.apply(f.clone()),
        p,
    );
    let swung = tr.compose(&f);
    let d = (swung.halo.bands[0].rotation_deg - plain.halo.bands[0].rotation_deg).rem_euclid(360.0);
    let expect = 90.0 * (PI * p.halo).sin();
    assert!((d - expect).abs() < 1e-9, "d={d} expect={expect}");
}

#[test]
fn advance_ignores_bad_deltas() {
    let mut tr = transition(PhaseId::Idle, PhaseId::Intro);
    tr.advance(-10.0);
    tr.advance(f64::NAN);
    assert_eq!(tr.elapsed_ms(), 0.0);
    tr.advance(10.0);
    assert_eq!(tr.elapsed_ms(), 10.0);
}

#[test]
fn composed_frames_stay_in_bounds() {
    for from in PhaseId::ALL {
        for to in PhaseId::ALL {
            let mut tr = transition(from, to);
            for step in 0..20 {
                let f = base_frame(step as f64 * 0.37);
                tr.compose(&f).check_bounds().unwrap();
                tr.advance(45.0);
            }
        }
    }
}

#[test]
fn current_context_tracks_base_progress() {
    let mut tr = transition(PhaseId::Idle, PhaseId::DoseReveal);
    assert_eq!(tr.current_context(), AnimationContext::NEUTRAL);
    tr.advance(10_000.0);
    assert_eq!(
        tr.current_context(),
        PhaseMachine::builtin().context_of(PhaseId::DoseReveal)
    );
}

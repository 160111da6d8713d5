use super::*;
use crate::playback::sink::InMemorySink;
use crate::playback::tick::ManualTickSource;
use crate::profile::tables::{EffectCategory, IntensityBucket};
use crate::timeline::reduced::fallback_frame;

fn config(reduce: bool) -> TimelineConfig {
    TimelineConfig::new(EffectCategory::Energetic, IntensityBucket::Heroic, 42, reduce)
}

fn viz(reduce: bool, opts: VisualizationOpts) -> Visualization<ManualTickSource> {
    Visualization::with_builtin(config(reduce), opts, ManualTickSource::new()).unwrap()
}

fn tick(v: &mut Visualization<ManualTickSource>, n: usize, delta_ms: f64) -> PumpStats {
    let mut sink = InMemorySink::new();
    for _ in 0..n {
        v.source_mut().advance(delta_ms);
    }
    v.pump(&mut sink).unwrap()
}

#[test]
fn idle_frames_match_the_engine() {
    let v = viz(false, VisualizationOpts::default());
    assert_eq!(v.phase(), PhaseId::Idle);
    assert_eq!(v.frame_at(2.5), v.engine().frame(2.5));
    assert_eq!(v.current_frame(), &v.engine().frame(0.0));
    assert!(!v.is_fallback());
}

#[test]
fn invalid_transition_duration_is_a_validation_error() {
    let opts = VisualizationOpts {
        transition_duration_ms: 0.0,
        ..VisualizationOpts::default()
    };
    let err = Visualization::with_builtin(config(false), opts, ManualTickSource::new())
        .err()
        .unwrap();
    assert!(matches!(err, AuraError::Validation(_)));
}

#[test]
fn bad_config_falls_back_to_the_static_frame() {
    let v = Visualization::from_config_or_static(
        TimelineConfig::parse("chaotic", "heroic", 1, false),
        &MotionTables::builtin(),
        PhaseMachine::builtin(),
        VisualizationOpts::default(),
        ManualTickSource::new(),
    );
    assert!(v.is_fallback());
    assert_eq!(v.current_frame(), &fallback_frame());
    assert!(v.engine().is_frozen());
}

#[test]
fn bad_opts_also_fall_back() {
    let opts = VisualizationOpts {
        transition_duration_ms: f64::NAN,
        ..VisualizationOpts::default()
    };
    let v = Visualization::from_config_or_static(
        Ok(config(false)),
        &MotionTables::builtin(),
        PhaseMachine::builtin(),
        opts,
        ManualTickSource::new(),
    );
    assert!(v.is_fallback());
    assert_eq!(v.opts(), &VisualizationOpts::default());
}

#[test]
fn phase_change_blends_then_settles() {
    let mut v = viz(false, VisualizationOpts::default());
    v.play();
    let change = v.set_phase(PhaseId::Intro).unwrap();
    assert_eq!(change.from, PhaseId::Idle);
    assert!(v.transition().is_some());
    assert_eq!(v.set_phase(PhaseId::Intro), None);

    tick(&mut v, 10, 16.0);
    let mid = v.transition().unwrap().progress().halo;
    assert!(mid > 0.0 && mid < 1.0);

    tick(&mut v, 40, 16.0);
    assert!(v.transition().is_none());
    let t = v.state().current_time_seconds;
    let want = v.phases().animation_context().apply(v.engine().frame(t));
    assert_eq!(v.current_frame(), &want);
}

#[test]
fn transitions_advance_on_skipped_ticks() {
    let opts = VisualizationOpts {
        scheduler: SchedulerOpts {
            throttle: ThrottleMode::Quarter,
            ..SchedulerOpts::default()
        },
        ..VisualizationOpts::default()
    };
    let mut v = viz(false, opts);
    v.play();
    v.set_phase(PhaseId::AxisFocus);
    let stats = tick(&mut v, 8, 20.0);
    assert_eq!(stats.frames_recomputed, 2);
    assert_eq!(stats.frames_skipped, 6);
    assert_eq!(v.transition().unwrap().elapsed_ms(), 160.0);
}

#[test]
fn mid_transition_request_starts_from_the_current_blend() {
    let mut v = viz(false, VisualizationOpts::default());
    v.play();
    v.set_phase(PhaseId::DoseReveal);
    tick(&mut v, 5, 16.0);
    let on_screen = v.transition().unwrap().current_context();

    v.set_phase(PhaseId::Outro);
    let tr = v.transition().unwrap();
    assert_eq!(tr.from(), PhaseId::DoseReveal);
    assert_eq!(tr.current_context(), on_screen);
}

#[test]
fn reduced_motion_phase_changes_are_instant() {
    let mut v = viz(true, VisualizationOpts::default());
    let before = v.current_frame().clone();
    v.set_phase(PhaseId::StrainSpotlight);
    assert!(v.transition().is_none());
    assert_eq!(v.phase(), PhaseId::StrainSpotlight);
    assert_eq!(v.current_frame(), &before);

    v.play();
    let stats = tick(&mut v, 5, 16.0);
    assert_eq!(stats.frames_recomputed, 1);
    assert_eq!(stats.frames_static, 4);
}

#[test]
fn static_frame_elision_skips_identical_pushes() {
    let opts = VisualizationOpts {
        static_frame_elision: true,
        ..VisualizationOpts::default()
    };
    let mut v = viz(false, opts);
    v.play();
    let mut sink = InMemorySink::new();
    v.source_mut().advance(16.0);
    v.source_mut().advance(0.0);
    v.source_mut().advance(0.0);
    let stats = v.pump(&mut sink).unwrap();
    assert_eq!(stats.frames_recomputed, 3);
    assert_eq!(stats.frames_pushed, 1);
    assert_eq!(stats.frames_elided, 2);
    assert_eq!(sink.frames().len(), 1);
}

#[test]
fn seek_updates_the_displayed_frame() {
    let mut v = viz(false, VisualizationOpts::default());
    v.seek_to(3.5);
    assert_eq!(v.current_frame(), &v.engine().frame(3.5));
    v.seek_to(-1.0);
    assert_eq!(v.state().current_time_seconds, 0.0);
}

#[test]
fn reset_finishes_the_transition_and_keeps_the_phase() {
    let mut v = viz(false, VisualizationOpts::default());
    v.play();
    v.set_phase(PhaseId::Message);
    tick(&mut v, 3, 16.0);
    v.reset();
    assert!(v.transition().is_none());
    assert_eq!(v.phase(), PhaseId::Message);
    assert_eq!(v.state().current_time_seconds, 0.0);
    assert_eq!(
        v.current_frame(),
        &v.phases().animation_context().apply(v.engine().frame(0.0))
    );
}

#[test]
fn teardown_stops_pushes() {
    let mut v = viz(false, VisualizationOpts::default());
    v.play();
    v.source_mut().advance(16.0);
    v.teardown();
    v.teardown();
    let stats = tick(&mut v, 3, 16.0);
    assert_eq!(stats.ticks, 0);
}

#[test]
fn sink_config_reports_band_count() {
    let v = viz(false, VisualizationOpts::default());
    let cfg = v.sink_config();
    assert_eq!(cfg.band_count, 3);
    assert_eq!(cfg.timeline, config(false));
}

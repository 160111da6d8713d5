use super::*;
use crate::playback::sink::InMemorySink;
use crate::playback::tick::ManualTickSource;
use crate::profile::tables::{EffectCategory, IntensityBucket, MotionTables};
use crate::timeline::config::TimelineConfig;

fn scheduler(reduce: bool, opts: SchedulerOpts) -> PlaybackScheduler<ManualTickSource> {
    let cfg = TimelineConfig::new(EffectCategory::Energetic, IntensityBucket::Heroic, 42, reduce);
    let engine = TimelineEngine::new(cfg, &MotionTables::builtin());
    PlaybackScheduler::new(engine, ManualTickSource::new(), opts).unwrap()
}

fn run(s: &mut PlaybackScheduler<ManualTickSource>, n: usize, delta_ms: f64) -> Vec<Tick> {
    (0..n)
        .filter_map(|_| {
            s.source_mut().advance(delta_ms);
            s.next_tick()
        })
        .collect()
}

#[test]
fn quarter_throttle_recomputes_every_fourth_tick() {
    let mut s = scheduler(
        false,
        SchedulerOpts {
            throttle: ThrottleMode::Quarter,
            ..SchedulerOpts::default()
        },
    );
    s.play();
    let ticks = run(&mut s, 8, 16.0);
    let recomputed = ticks
        .iter()
        .filter(|t| t.kind == TickKind::Recomputed)
        .count();
    assert_eq!(recomputed, 2);
    assert!((s.state().current_time_seconds - 0.128).abs() < 1e-12);
    assert_eq!(s.state().frame_number, 2);
    assert_eq!(s.state().tick_index, 8);
}

#[test]
fn skipped_ticks_keep_the_previous_frame() {
    let mut s = scheduler(
        false,
        SchedulerOpts {
            throttle: ThrottleMode::Half,
            ..SchedulerOpts::default()
        },
    );
    s.play();
    run(&mut s, 1, 16.0);
    let shown = s.current_frame().clone();
    let t = run(&mut s, 1, 16.0);
    assert_eq!(t[0].kind, TickKind::Skipped);
    assert_eq!(s.current_frame(), &shown);
}

#[test]
fn large_deltas_are_clamped() {
    let mut s = scheduler(false, SchedulerOpts::default());
    s.play();
    let t = run(&mut s, 1, 5_000.0);
    assert_eq!(t[0].delta_ms, 100.0);
    assert!((s.state().current_time_seconds - 0.1).abs() < 1e-12);
}

#[test]
fn negative_deltas_count_as_zero() {
    let mut s = scheduler(false, SchedulerOpts::default());
    s.play();
    run(&mut s, 1, 50.0);
    let t = run(&mut s, 1, -30.0);
    assert_eq!(t[0].delta_ms, 0.0);
    assert!((s.state().current_time_seconds - 0.05).abs() < 1e-12);
}

#[test]
fn clock_wraps_at_the_loop_end() {
    let mut s = scheduler(false, SchedulerOpts::default());
    s.seek_to(7.95);
    s.play();
    run(&mut s, 1, 100.0);
    assert!((s.state().current_time_seconds - 0.05).abs() < 1e-9);
    assert!((s.state().session_elapsed_seconds - 0.1).abs() < 1e-12);
}

#[test]
fn seek_clamps_and_keeps_state() {
    let mut s = scheduler(false, SchedulerOpts::default());
    s.seek_to(-5.0);
    assert_eq!(s.state().current_time_seconds, 0.0);
    s.seek_to(108.0);
    assert_eq!(s.state().current_time_seconds, LOOP_DURATION_SECS);
    s.seek_to(f64::NAN);
    assert_eq!(s.state().current_time_seconds, 0.0);
    assert_eq!(s.state().status, PlaybackStatus::Stopped);

    s.play();
    s.seek_to(3.0);
    assert_eq!(s.state().status, PlaybackStatus::Playing);
    assert_eq!(s.current_frame(), &s.engine().frame(3.0));
}

#[test]
fn seek_forces_a_recompute_through_throttle() {
    let mut s = scheduler(
        false,
        SchedulerOpts {
            throttle: ThrottleMode::Quarter,
            ..SchedulerOpts::default()
        },
    );
    s.play();
    run(&mut s, 1, 16.0);
    s.seek_to(4.0);
    let t = run(&mut s, 1, 16.0);
    assert_eq!(t[0].tick_index, 1);
    assert_eq!(t[0].kind, TickKind::Recomputed);
}

#[test]
fn throttle_change_applies_at_the_next_tick() {
    let mut s = scheduler(false, SchedulerOpts::default());
    s.play();
    s.set_throttle(ThrottleMode::Quarter);
    assert_eq!(s.state().throttle_mode, ThrottleMode::Full);
    let ticks = run(&mut s, 4, 16.0);
    assert_eq!(s.state().throttle_mode, ThrottleMode::Quarter);
    let kinds: Vec<_> = ticks.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TickKind::Recomputed,
            TickKind::Skipped,
            TickKind::Skipped,
            TickKind::Skipped
        ]
    );
}

#[test]
fn pause_holds_the_clock_and_resume_uses_a_fresh_baseline() {
    let mut s = scheduler(false, SchedulerOpts::default());
    s.play();
    run(&mut s, 2, 20.0);
    s.pause();
    assert_eq!(s.state().status, PlaybackStatus::Paused);
    assert!(run(&mut s, 3, 20.0).is_empty());
    assert!((s.state().current_time_seconds - 0.04).abs() < 1e-12);

    s.play();
    run(&mut s, 1, 10.0);
    assert!((s.state().current_time_seconds - 0.05).abs() < 1e-12);
}

#[test]
fn teardown_is_idempotent_and_drops_pending_ticks() {
    let mut s = scheduler(false, SchedulerOpts::default());
    s.play();
    s.source_mut().advance(16.0);
    s.source_mut().advance(16.0);
    s.teardown();
    s.teardown();
    assert_eq!(s.state().status, PlaybackStatus::Stopped);
    assert!(!s.state().is_playing);
    assert_eq!(s.next_tick(), None);

    s.source_mut().advance(10_000.0);
    s.play();
    let t = run(&mut s, 1, 16.0);
    assert_eq!(t[0].delta_ms, 16.0);
}

#[test]
fn reset_clears_counters() {
    let mut s = scheduler(false, SchedulerOpts::default());
    s.play();
    run(&mut s, 5, 16.0);
    s.reset();
    assert_eq!(s.state().current_time_seconds, 0.0);
    assert_eq!(s.state().frame_number, 0);
    assert_eq!(s.state().tick_index, 0);
    assert_eq!(s.state().status, PlaybackStatus::Stopped);
    assert_eq!(s.current_frame(), &s.engine().frame(0.0));
}

#[test]
fn frozen_engine_recomputes_once_then_serves_static_ticks() {
    let mut s = scheduler(true, SchedulerOpts::default());
    s.play();
    let ticks = run(&mut s, 4, 16.0);
    assert_eq!(ticks[0].kind, TickKind::Recomputed);
    assert!(ticks[1..].iter().all(|t| t.kind == TickKind::Static));
    assert!(s.current_frame().reduce_motion);
    assert!((s.state().current_time_seconds - 0.064).abs() < 1e-12);
}

#[test]
fn pump_pushes_numbered_frames() {
    let mut s = scheduler(
        false,
        SchedulerOpts {
            throttle: ThrottleMode::Half,
            ..SchedulerOpts::default()
        },
    );
    s.play();
    for _ in 0..6 {
        s.source_mut().advance(16.0);
    }
    let mut sink = InMemorySink::new();
    let stats = s.pump(&mut sink).unwrap();
    assert_eq!(stats.ticks, 6);
    assert_eq!(stats.frames_recomputed, 3);
    assert_eq!(stats.frames_skipped, 3);
    let numbers: Vec<_> = sink.frames().iter().map(|(n, _)| *n).collect();
    assert_eq!(numbers, vec![0, 1, 2]);
}

#[test]
fn diagnostics_are_opt_in() {
    let mut off = scheduler(false, SchedulerOpts::default());
    off.play();
    run(&mut off, 3, 16.0);
    assert_eq!(off.diagnostics(), None);

    let mut on = scheduler(
        false,
        SchedulerOpts {
            diagnostics: true,
            ..SchedulerOpts::default()
        },
    );
    on.play();
    run(&mut on, 3, 16.0);
    let d = on.diagnostics().unwrap();
    assert_eq!(d.compute_samples, 3);
    assert_eq!(d.fps_samples, 3);
    assert_eq!(d.mean_fps, Some(62.5));
    assert_eq!(on.current_frame(), off.current_frame());
}

#[test]
fn invalid_max_delta_is_rejected() {
    let cfg = TimelineConfig::new(EffectCategory::Social, IntensityBucket::Low, 1, false);
    let engine = TimelineEngine::new(cfg, &MotionTables::builtin());
    let opts = SchedulerOpts {
        max_delta_ms: 0.0,
        ..SchedulerOpts::default()
    };
    assert!(PlaybackScheduler::new(engine, ManualTickSource::new(), opts).is_err());
}

#[test]
fn throttle_names_parse() {
    assert_eq!("Quarter".parse::<ThrottleMode>().unwrap(), ThrottleMode::Quarter);
    assert!("double".parse::<ThrottleMode>().is_err());
}

use super::*;

#[test]
fn window_keeps_the_latest_sixty() {
    let mut w = RollingWindow::default();
    for i in 0..100 {
        w.push(i as f64);
    }
    assert_eq!(w.len(), WINDOW_LEN);
    assert_eq!(w.max(), Some(99.0));
    assert_eq!(w.mean(), Some((40..100).sum::<i32>() as f64 / 60.0));
}

#[test]
fn non_finite_samples_are_dropped() {
    let mut w = RollingWindow::default();
    w.push(f64::NAN);
    w.push(f64::INFINITY);
    assert_eq!(w.len(), 0);
    assert_eq!(w.mean(), None);
}

#[test]
fn fps_is_derived_from_deltas() {
    let mut d = TickDiagnostics::default();
    d.record_delta(0.0);
    d.record_delta(20.0);
    d.record_delta(25.0);
    let s = d.snapshot();
    assert_eq!(s.fps_samples, 2);
    assert_eq!(s.mean_fps, Some(45.0));

    d.clear();
    assert_eq!(d.snapshot(), DiagnosticsSnapshot::default());
}

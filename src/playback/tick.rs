use std::collections::VecDeque;
use std::time::{Duration, Instant};

const DEFAULT_INTERVAL: Duration = Duration::from_nanos(16_666_667);

/// Source of display-refresh ticks.
///
/// Timestamps are milliseconds on a monotonic clock private to the source. The scheduler only
/// ever compares timestamps from one source with each other.
pub trait TickSource {
    /// Begin delivering ticks.
    fn start(&mut self);
    /// Stop delivering ticks and drop any that are pending.
    fn stop(&mut self);
    /// Current clock reading.
    fn now_ms(&self) -> f64;
    /// Next due tick timestamp, if any.
    fn poll_tick(&mut self) -> Option<f64>;
}

/// Tick source driven entirely by the caller.
///
/// [`ManualTickSource::advance`] moves the clock and, while started, queues one tick at the
/// new time.
#[derive(Clone, Debug, Default)]
pub struct ManualTickSource {
    now_ms: f64,
    running: bool,
    pending: VecDeque<f64>,
}

impl ManualTickSource {
    /// Stopped source at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock by `delta_ms` (which may be negative) and queue a tick if running.
    pub fn advance(&mut self, delta_ms: f64) {
        self.now_ms += delta_ms;
        if self.running {
            self.pending.push_back(self.now_ms);
        }
    }

    /// Whether [`TickSource::start`] is in effect.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks queued but not yet polled.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl TickSource for ManualTickSource {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
        self.pending.clear();
    }

    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn poll_tick(&mut self) -> Option<f64> {
        self.pending.pop_front()
    }
}

/// Wall-clock source that becomes due once per `interval`.
///
/// Polling never blocks. Missed intervals collapse into a single tick; the scheduler's delta
/// clamp covers the gap.
#[derive(Clone, Debug)]
pub struct IntervalTickSource {
    origin: Instant,
    interval: Duration,
    next_due: Option<Instant>,
}

impl IntervalTickSource {
    /// Source ticking every `interval` once started.
    pub fn new(interval: Duration) -> Self {
        Self {
            origin: Instant::now(),
            interval,
            next_due: None,
        }
    }

    /// Source at a refresh rate in Hz. Rates that are not positive, or so small that the
    /// interval does not fit a [`Duration`], fall back to 60 Hz.
    pub fn from_hz(hz: f64) -> Self {
        let interval = Some(hz)
            .filter(|hz| hz.is_finite() && *hz > 0.0)
            .and_then(|hz| Duration::try_from_secs_f64(1.0 / hz).ok())
            .unwrap_or(DEFAULT_INTERVAL);
        Self::new(interval)
    }
}

impl TickSource for IntervalTickSource {
    fn start(&mut self) {
        self.next_due = Some(Instant::now() + self.interval);
    }

    fn stop(&mut self) {
        self.next_due = None;
    }

    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn poll_tick(&mut self) -> Option<f64> {
        let due = self.next_due?;
        let now = Instant::now();
        if now < due {
            return None;
        }
        self.next_due = Some(now + self.interval);
        Some(now.duration_since(self.origin).as_secs_f64() * 1000.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/tick.rs"]
mod tests;

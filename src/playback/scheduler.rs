use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::foundation::core::{LOOP_DURATION_SECS, wrap_loop_time};
use crate::foundation::error::{AuraError, AuraResult};
use crate::playback::sink::FrameSink;
use crate::playback::stats::{DiagnosticsSnapshot, TickDiagnostics};
use crate::playback::tick::TickSource;
use crate::timeline::engine::TimelineEngine;
use crate::timeline::frame::AnimationFrame;

/// How often ticks recompute the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleMode {
    /// Every tick.
    #[default]
    Full,
    /// Every second tick.
    Half,
    /// Every fourth tick.
    Quarter,
}

impl ThrottleMode {
    /// Every mode, fastest first.
    pub const ALL: [ThrottleMode; 3] = [
        ThrottleMode::Full,
        ThrottleMode::Half,
        ThrottleMode::Quarter,
    ];

    /// A tick recomputes when `tick_index % skip_rate == 0`.
    pub fn skip_rate(self) -> u64 {
        match self {
            Self::Full => 1,
            Self::Half => 2,
            Self::Quarter => 4,
        }
    }

    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "half",
            Self::Quarter => "quarter",
        }
    }
}

impl fmt::Display for ThrottleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThrottleMode {
    type Err = AuraError;

    fn from_str(s: &str) -> AuraResult<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| AuraError::config(format!("unknown throttle mode '{}'", s.trim())))
    }
}

/// Scheduler lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    /// Not started, reset or torn down.
    #[default]
    Stopped,
    /// Ticks advance the clock.
    Playing,
    /// Clock held; resumes on `play`.
    Paused,
}

/// Scheduler-owned playback bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlaybackState {
    /// Loop-local clock, `[0, 8]` (8 only right after a seek to the end).
    pub current_time_seconds: f64,
    /// `status == Playing`.
    pub is_playing: bool,
    /// Frames recomputed since the last reset.
    pub frame_number: u64,
    /// Throttle in effect for the current tick.
    pub throttle_mode: ThrottleMode,
    /// Lifecycle state.
    pub status: PlaybackStatus,
    /// Ticks handled since the last reset.
    pub tick_index: u64,
    /// Unwrapped time accumulated by ticks since the last reset.
    pub session_elapsed_seconds: f64,
}

/// Scheduler options.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SchedulerOpts {
    /// Initial throttle.
    pub throttle: ThrottleMode,
    /// Upper bound on a single tick's delta, e.g. after the host was suspended.
    pub max_delta_ms: f64,
    /// Keep rolling compute-latency and fps windows.
    pub diagnostics: bool,
}

impl SchedulerOpts {
    /// `max_delta_ms` must be finite and positive.
    pub fn validate(&self) -> AuraResult<()> {
        if !self.max_delta_ms.is_finite() || self.max_delta_ms <= 0.0 {
            return Err(AuraError::validation(format!(
                "max_delta_ms must be finite and > 0, got {}",
                self.max_delta_ms
            )));
        }
        Ok(())
    }
}

impl Default for SchedulerOpts {
    fn default() -> Self {
        Self {
            throttle: ThrottleMode::Full,
            max_delta_ms: 100.0,
            diagnostics: false,
        }
    }
}

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickKind {
    /// A new frame was computed.
    Recomputed,
    /// Throttled; the previous frame stays current.
    Skipped,
    /// Reduced motion; the frozen frame stays current.
    Static,
}

/// Result of one handled tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tick {
    /// Clamped delta the clock advanced by.
    pub delta_ms: f64,
    /// Clock after the tick.
    pub time_seconds: f64,
    /// Index of this tick since the last reset.
    pub tick_index: u64,
    /// What happened.
    pub kind: TickKind,
    /// Number of the recomputed frame, for [`TickKind::Recomputed`].
    pub frame_number: Option<u64>,
}

/// Tick accounting for one pump.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PumpStats {
    /// Ticks handled.
    pub ticks: u64,
    /// Ticks that recomputed a frame.
    pub frames_recomputed: u64,
    /// Ticks skipped by throttling.
    pub frames_skipped: u64,
    /// Ticks served by the frozen frame.
    pub frames_static: u64,
    /// Frames handed to the sink.
    pub frames_pushed: u64,
    /// Recomputed frames not pushed because they matched the last pushed one.
    pub frames_elided: u64,
}

/// Drives one [`TimelineEngine`] from a [`TickSource`].
///
/// The only owner of playback time. Between ticks nothing changes; frames are produced only
/// inside [`PlaybackScheduler::tick_at`] and [`PlaybackScheduler::seek_to`].
pub struct PlaybackScheduler<S: TickSource> {
    engine: TimelineEngine,
    source: S,
    opts: SchedulerOpts,
    state: PlaybackState,
    pending_throttle: Option<ThrottleMode>,
    last_tick_ms: Option<f64>,
    force_recompute: bool,
    frame: AnimationFrame,
    diagnostics: TickDiagnostics,
}

impl<S: TickSource> PlaybackScheduler<S> {
    /// Stopped scheduler at time zero.
    pub fn new(engine: TimelineEngine, source: S, opts: SchedulerOpts) -> AuraResult<Self> {
        opts.validate()?;
        Ok(Self::from_validated(engine, source, opts))
    }

    /// Caller has already run [`SchedulerOpts::validate`].
    pub(crate) fn from_validated(engine: TimelineEngine, source: S, opts: SchedulerOpts) -> Self {
        let frame = engine.frame(0.0);
        Self {
            engine,
            source,
            state: PlaybackState {
                throttle_mode: opts.throttle,
                ..PlaybackState::default()
            },
            opts,
            pending_throttle: None,
            last_tick_ms: None,
            force_recompute: true,
            frame,
            diagnostics: TickDiagnostics::default(),
        }
    }

    /// Start or resume. Timing restarts from the source's current reading, so time spent
    /// paused or stopped is never replayed.
    pub fn play(&mut self) {
        if self.state.status == PlaybackStatus::Playing {
            return;
        }
        if self.state.status == PlaybackStatus::Stopped {
            self.force_recompute = true;
        }
        self.last_tick_ms = Some(self.source.now_ms());
        self.source.start();
        self.set_status(PlaybackStatus::Playing);
        tracing::debug!(time = self.state.current_time_seconds, "play");
    }

    /// Hold the clock. No-op unless playing.
    pub fn pause(&mut self) {
        if self.state.status != PlaybackStatus::Playing {
            return;
        }
        self.source.stop();
        self.last_tick_ms = None;
        self.set_status(PlaybackStatus::Paused);
        tracing::debug!(time = self.state.current_time_seconds, "pause");
    }

    /// Jump to `time_seconds`, clamped to `[0, 8]`; non-finite input seeks to `0`.
    ///
    /// The frame is recomputed immediately and the next tick recomputes regardless of throttle.
    /// Lifecycle state is unchanged.
    pub fn seek_to(&mut self, time_seconds: f64) {
        let t = if time_seconds.is_finite() {
            time_seconds.clamp(0.0, LOOP_DURATION_SECS)
        } else {
            0.0
        };
        self.state.current_time_seconds = t;
        self.frame = self.engine.frame(t);
        self.force_recompute = true;
        tracing::debug!(requested = time_seconds, time = t, "seek");
    }

    /// Back to time zero with counters and diagnostics cleared, stopped.
    pub fn reset(&mut self) {
        self.source.stop();
        self.last_tick_ms = None;
        if let Some(m) = self.pending_throttle.take() {
            self.state.throttle_mode = m;
        }
        self.state = PlaybackState {
            throttle_mode: self.state.throttle_mode,
            ..PlaybackState::default()
        };
        self.diagnostics.clear();
        self.frame = self.engine.frame(0.0);
        self.force_recompute = true;
        tracing::debug!("reset");
    }

    /// Stop the source and drop pending ticks. Safe to call repeatedly; a later
    /// [`PlaybackScheduler::play`] starts from a fresh baseline.
    pub fn teardown(&mut self) {
        self.source.stop();
        self.last_tick_ms = None;
        if self.state.status != PlaybackStatus::Stopped {
            tracing::debug!("teardown");
        }
        self.set_status(PlaybackStatus::Stopped);
    }

    /// Queue a throttle change; it applies from the next tick on.
    pub fn set_throttle(&mut self, mode: ThrottleMode) {
        self.pending_throttle = Some(mode);
    }

    /// Handle a tick stamped `now_ms`. Returns `None` unless playing.
    pub fn tick_at(&mut self, now_ms: f64) -> Option<Tick> {
        if self.state.status != PlaybackStatus::Playing {
            return None;
        }
        if let Some(m) = self.pending_throttle.take() {
            tracing::debug!(from = %self.state.throttle_mode, to = %m, "throttle change");
            self.state.throttle_mode = m;
        }

        let raw = match self.last_tick_ms {
            Some(last) => now_ms - last,
            None => 0.0,
        };
        let delta_ms = if raw.is_finite() && raw > 0.0 {
            if raw > self.opts.max_delta_ms {
                tracing::trace!(raw, max = self.opts.max_delta_ms, "clamped tick delta");
            }
            raw.min(self.opts.max_delta_ms)
        } else {
            0.0
        };
        if now_ms.is_finite() {
            self.last_tick_ms = Some(now_ms);
        }

        let dt = delta_ms / 1000.0;
        self.state.current_time_seconds = wrap_loop_time(self.state.current_time_seconds + dt);
        self.state.session_elapsed_seconds += dt;
        if self.opts.diagnostics {
            self.diagnostics.record_delta(delta_ms);
        }

        let tick_index = self.state.tick_index;
        self.state.tick_index += 1;

        let due = tick_index % self.state.throttle_mode.skip_rate() == 0;
        let kind = if self.force_recompute || (due && !self.engine.is_frozen()) {
            TickKind::Recomputed
        } else if self.engine.is_frozen() {
            TickKind::Static
        } else {
            TickKind::Skipped
        };

        let frame_number = match kind {
            TickKind::Recomputed => Some(self.recompute()),
            TickKind::Skipped => {
                tracing::trace!(tick_index, "tick skipped by throttle");
                None
            }
            TickKind::Static => None,
        };

        Some(Tick {
            delta_ms,
            time_seconds: self.state.current_time_seconds,
            tick_index,
            kind,
            frame_number,
        })
    }

    /// Poll the source once and handle the tick, if any.
    pub fn next_tick(&mut self) -> Option<Tick> {
        let now = self.source.poll_tick()?;
        self.tick_at(now)
    }

    /// Handle every pending tick, pushing each recomputed frame to `sink`.
    pub fn pump(&mut self, sink: &mut dyn FrameSink) -> AuraResult<PumpStats> {
        let mut stats = PumpStats::default();
        while let Some(tick) = self.next_tick() {
            stats.ticks += 1;
            match tick.kind {
                TickKind::Recomputed => {
                    stats.frames_recomputed += 1;
                    if let Some(n) = tick.frame_number {
                        sink.push_frame(n, &self.frame)?;
                        stats.frames_pushed += 1;
                    }
                }
                TickKind::Skipped => stats.frames_skipped += 1,
                TickKind::Static => stats.frames_static += 1,
            }
        }
        Ok(stats)
    }

    /// Most recently computed frame.
    pub fn current_frame(&self) -> &AnimationFrame {
        &self.frame
    }

    /// Engine this scheduler drives.
    pub fn engine(&self) -> &TimelineEngine {
        &self.engine
    }

    /// Playback bookkeeping.
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Options this scheduler was built with.
    pub fn opts(&self) -> &SchedulerOpts {
        &self.opts
    }

    /// Tick source, e.g. to drive a [`crate::ManualTickSource`].
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Diagnostics summary, or `None` when diagnostics are off.
    pub fn diagnostics(&self) -> Option<DiagnosticsSnapshot> {
        self.opts.diagnostics.then(|| self.diagnostics.snapshot())
    }

    fn recompute(&mut self) -> u64 {
        let started = self.opts.diagnostics.then(Instant::now);
        self.frame = self.engine.frame(self.state.current_time_seconds);
        if let Some(s) = started {
            self.diagnostics.record_compute(s.elapsed().as_secs_f64() * 1000.0);
        }
        self.force_recompute = false;
        let n = self.state.frame_number;
        self.state.frame_number += 1;
        n
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        self.state.status = status;
        self.state.is_playing = status == PlaybackStatus::Playing;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;

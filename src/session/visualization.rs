use crate::compile::fingerprint::{FrameFingerprint, fingerprint_frame};
use crate::foundation::error::{AuraError, AuraResult};
use crate::interp::transition::{DEFAULT_TRANSITION_MS, PhaseTransition};
use crate::phase::context::AnimationContext;
use crate::phase::machine::{PhaseChange, PhaseMachine};
use crate::phase::registry::PhaseId;
use crate::playback::scheduler::{
    PlaybackScheduler, PlaybackState, PumpStats, SchedulerOpts, ThrottleMode, TickKind,
};
use crate::playback::sink::{FrameSink, SinkConfig};
use crate::playback::stats::DiagnosticsSnapshot;
use crate::playback::tick::TickSource;
use crate::profile::tables::MotionTables;
use crate::timeline::config::TimelineConfig;
use crate::timeline::engine::TimelineEngine;
use crate::timeline::frame::AnimationFrame;
use crate::timeline::reduced::FALLBACK_CONFIG;

/// Options controlling a [`Visualization`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VisualizationOpts {
    /// Playback scheduler options.
    pub scheduler: SchedulerOpts,
    /// Base length of a phase transition.
    pub transition_duration_ms: f64,
    /// Skip pushing a recomputed frame that looks identical to the last pushed one.
    pub static_frame_elision: bool,
}

impl VisualizationOpts {
    /// Reject non-positive durations and invalid scheduler options.
    pub fn validate(&self) -> AuraResult<()> {
        self.scheduler.validate()?;
        if !self.transition_duration_ms.is_finite() || self.transition_duration_ms <= 0.0 {
            return Err(AuraError::validation(format!(
                "transition_duration_ms must be finite and > 0, got {}",
                self.transition_duration_ms
            )));
        }
        Ok(())
    }
}

impl Default for VisualizationOpts {
    fn default() -> Self {
        Self {
            scheduler: SchedulerOpts::default(),
            transition_duration_ms: DEFAULT_TRANSITION_MS,
            static_frame_elision: false,
        }
    }
}

/// One running visualization instance.
///
/// Owns the engine (through its scheduler), the phase machine and the active transition, and is
/// the only producer of displayed frames. Instances share nothing with each other.
pub struct Visualization<S: TickSource> {
    scheduler: PlaybackScheduler<S>,
    phases: PhaseMachine,
    transition: Option<PhaseTransition>,
    opts: VisualizationOpts,
    fallback: bool,
    last_pushed: Option<FrameFingerprint>,
    displayed: AnimationFrame,
}

impl<S: TickSource> Visualization<S> {
    /// Build a stopped visualization.
    #[tracing::instrument(skip(tables, phases, source))]
    pub fn new(
        config: TimelineConfig,
        tables: &MotionTables,
        phases: PhaseMachine,
        opts: VisualizationOpts,
        source: S,
    ) -> AuraResult<Self> {
        opts.validate()?;
        Ok(Self::assemble(
            TimelineEngine::new(config, tables),
            phases,
            opts,
            source,
            false,
        ))
    }

    /// [`Visualization::new`] over the built-in tables, phases and choreography.
    pub fn with_builtin(
        config: TimelineConfig,
        opts: VisualizationOpts,
        source: S,
    ) -> AuraResult<Self> {
        Self::new(
            config,
            &MotionTables::builtin(),
            PhaseMachine::builtin(),
            opts,
            source,
        )
    }

    /// Build from a config that may have failed to load.
    ///
    /// Any construction error (a bad config or invalid options) is logged and replaced by the
    /// frozen [`FALLBACK_CONFIG`] over the built-in tables. Never fails.
    #[tracing::instrument(skip_all)]
    pub fn from_config_or_static(
        config: AuraResult<TimelineConfig>,
        tables: &MotionTables,
        phases: PhaseMachine,
        opts: VisualizationOpts,
        source: S,
    ) -> Self {
        let opts = opts.validate().map(|()| opts);
        match (config, opts) {
            (Ok(config), Ok(opts)) => Self::assemble(
                TimelineEngine::new(config, tables),
                phases,
                opts,
                source,
                false,
            ),
            (config, opts) => {
                let reason = config.err().or(opts.err()).map(|e| e.to_string());
                tracing::warn!(
                    reason = reason.as_deref().unwrap_or("unknown"),
                    "visualization falling back to the static frame"
                );
                Self::assemble(
                    TimelineEngine::new(FALLBACK_CONFIG, &MotionTables::builtin()),
                    phases,
                    VisualizationOpts::default(),
                    source,
                    true,
                )
            }
        }
    }

    fn assemble(
        engine: TimelineEngine,
        phases: PhaseMachine,
        opts: VisualizationOpts,
        source: S,
        fallback: bool,
    ) -> Self {
        let scheduler = PlaybackScheduler::from_validated(engine, source, opts.scheduler);
        let displayed = phases
            .animation_context()
            .apply(scheduler.current_frame().clone());
        Self {
            scheduler,
            phases,
            transition: None,
            opts,
            fallback,
            last_pushed: None,
            displayed,
        }
    }

    /// Whether this instance is serving the fallback frame.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Start or resume playback.
    pub fn play(&mut self) {
        self.scheduler.play();
    }

    /// Hold playback.
    pub fn pause(&mut self) {
        self.scheduler.pause();
    }

    /// Jump to `time_seconds` (clamped to the loop); the displayed frame updates immediately.
    pub fn seek_to(&mut self, time_seconds: f64) {
        self.scheduler.seek_to(time_seconds);
        self.refresh_displayed();
    }

    /// Back to time zero, stopped. The current phase is kept; an active transition is finished.
    pub fn reset(&mut self) {
        self.scheduler.reset();
        self.transition = None;
        self.last_pushed = None;
        self.refresh_displayed();
    }

    /// Stop ticking. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.scheduler.teardown();
    }

    /// Queue a throttle change for the next tick.
    pub fn set_throttle(&mut self, mode: ThrottleMode) {
        self.scheduler.set_throttle(mode);
    }

    /// Switch phase.
    ///
    /// Starts a choreographed transition from whatever context is on screen, so a request
    /// arriving mid-transition continues from the current blend. With reduced motion the switch
    /// is instant. Returns `None` when `id` is already current.
    pub fn set_phase(&mut self, id: PhaseId) -> Option<PhaseChange> {
        let on_screen = self.displayed_context();
        let change = self.phases.set_phase(id)?;
        self.transition = if self.scheduler.engine().is_frozen() {
            None
        } else {
            Some(PhaseTransition::new(
                change.from,
                change.to,
                on_screen,
                self.phases.animation_context(),
                self.phases.choreography(change.from, change.to),
                self.opts.transition_duration_ms,
            ))
        };
        self.refresh_displayed();
        Some(change)
    }

    /// Switch phase by name.
    pub fn set_phase_named(&mut self, name: &str) -> AuraResult<Option<PhaseChange>> {
        Ok(self.set_phase(name.parse()?))
    }

    /// Compose the frame at `t` with the current phase and transition state, without touching
    /// playback.
    pub fn frame_at(&self, t: f64) -> AnimationFrame {
        self.compose(&self.scheduler.engine().frame(t))
    }

    /// Frame currently on screen.
    pub fn current_frame(&self) -> &AnimationFrame {
        &self.displayed
    }

    /// Handle every pending tick and push composed frames to `sink`.
    ///
    /// Each tick's delta advances the active transition, including throttled ticks.
    pub fn pump(&mut self, sink: &mut dyn FrameSink) -> AuraResult<PumpStats> {
        let mut stats = PumpStats::default();
        while let Some(tick) = self.scheduler.next_tick() {
            stats.ticks += 1;
            if let Some(tr) = self.transition.as_mut() {
                tr.advance(tick.delta_ms);
            }

            match tick.kind {
                TickKind::Recomputed => {
                    stats.frames_recomputed += 1;
                    self.refresh_displayed();
                    if let Some(n) = tick.frame_number {
                        if self.should_push() {
                            sink.push_frame(n, &self.displayed)?;
                            stats.frames_pushed += 1;
                        } else {
                            stats.frames_elided += 1;
                        }
                    }
                }
                TickKind::Skipped => stats.frames_skipped += 1,
                TickKind::Static => stats.frames_static += 1,
            }

            if self.transition.as_ref().is_some_and(PhaseTransition::is_complete) {
                tracing::debug!(phase = %self.phases.current(), "transition complete");
                self.transition = None;
            }
        }
        Ok(stats)
    }

    /// Sink configuration for this instance.
    pub fn sink_config(&self) -> SinkConfig {
        let engine = self.scheduler.engine();
        SinkConfig {
            timeline: *engine.config(),
            band_count: engine.band_count(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> PhaseId {
        self.phases.current()
    }

    /// Phase machine, for highlight and message queries.
    pub fn phases(&self) -> &PhaseMachine {
        &self.phases
    }

    /// Active transition, if any.
    pub fn transition(&self) -> Option<&PhaseTransition> {
        self.transition.as_ref()
    }

    /// Playback bookkeeping.
    pub fn state(&self) -> &PlaybackState {
        self.scheduler.state()
    }

    /// Diagnostics summary, when enabled.
    pub fn diagnostics(&self) -> Option<DiagnosticsSnapshot> {
        self.scheduler.diagnostics()
    }

    /// Engine behind this instance.
    pub fn engine(&self) -> &TimelineEngine {
        self.scheduler.engine()
    }

    /// Options in effect.
    pub fn opts(&self) -> &VisualizationOpts {
        &self.opts
    }

    /// Tick source, e.g. to drive a [`crate::ManualTickSource`].
    pub fn source_mut(&mut self) -> &mut S {
        self.scheduler.source_mut()
    }

    fn displayed_context(&self) -> AnimationContext {
        match &self.transition {
            Some(tr) => tr.current_context(),
            None => self.phases.animation_context(),
        }
    }

    fn compose(&self, base: &AnimationFrame) -> AnimationFrame {
        match &self.transition {
            Some(tr) => tr.compose(base),
            None => self.phases.animation_context().apply(base.clone()),
        }
    }

    fn refresh_displayed(&mut self) {
        self.displayed = self.compose(self.scheduler.current_frame());
    }

    fn should_push(&mut self) -> bool {
        if !self.opts.static_frame_elision {
            return true;
        }
        let fp = fingerprint_frame(&self.displayed);
        if self.last_pushed == Some(fp) {
            return false;
        }
        self.last_pushed = Some(fp);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/visualization.rs"]
mod tests;

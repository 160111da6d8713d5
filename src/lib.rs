//! Aurascope computes the animation state of an ambient, multi-layer visualization: a glow halo,
//! twinkling star layers, a breathing radar polygon and fading message text.
//!
//! Frames are a pure function of `(t mod 8 s, TimelineConfig)`. The same selection always
//! yields bit-identical frames, the loop seam at 8 s is continuous for sinusoidal fields, and
//! every field stays inside a documented interval (see [`ranges`]).
//!
//! - Build a [`TimelineConfig`] for a selection
//! - Compute single frames with [`TimelineEngine`] or [`compute_frame`]
//! - Run a [`Visualization`] to get playback, narrative phases and choreographed transitions,
//!   streaming frames into a [`FrameSink`]
//!
//! Painting frames into pixels is up to the host.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod compile;
pub(crate) mod interp;
pub(crate) mod phase;
pub(crate) mod playback;
pub(crate) mod profile;
pub(crate) mod session;
pub(crate) mod timeline;

pub use animation::ease::Ease;
pub use animation::hash::hash_to_float;
pub use compile::fingerprint::{FrameFingerprint, fingerprint_frame};
pub use foundation::core::{LOOP_DURATION_SECS, wrap_loop_time};
pub use foundation::error::{AuraError, AuraResult};
pub use interp::blend::{LayerProgress, blend_layers, interpolate};
pub use interp::transition::{DEFAULT_TRANSITION_MS, PhaseTransition};
pub use phase::choreography::{ChoreographyDescriptor, ChoreographyEntry, ChoreographyTable};
pub use phase::context::AnimationContext;
pub use phase::machine::{PhaseChange, PhaseMachine};
pub use phase::registry::{PhaseDescriptor, PhaseId, PhaseRegistry};
pub use playback::scheduler::{
    PlaybackScheduler, PlaybackState, PlaybackStatus, PumpStats, SchedulerOpts, ThrottleMode,
    Tick, TickKind,
};
pub use playback::sink::{FrameSink, InMemorySink, JsonLinesSink, SinkConfig};
pub use playback::stats::{DiagnosticsSnapshot, TickDiagnostics, WINDOW_LEN};
pub use playback::tick::{IntervalTickSource, ManualTickSource, TickSource};
pub use profile::tables::{EffectCategory, IntensityBucket, MotionProfile, MotionTables};
pub use session::visualization::{Visualization, VisualizationOpts};
pub use timeline::config::TimelineConfig;
pub use timeline::engine::{TimelineEngine, compute_frame};
pub use timeline::frame::{
    AnimationFrame, FieldRange, HaloBand, HaloBands, HaloFrame, MessageFrame, RadarFrame,
    StarLayer, StarsFrame, ranges,
};
pub use timeline::reduced::{FALLBACK_CONFIG, fallback_frame};

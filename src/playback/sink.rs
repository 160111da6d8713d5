use crate::foundation::error::AuraResult;
use crate::timeline::config::TimelineConfig;
use crate::timeline::frame::AnimationFrame;

/// Configuration handed to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SinkConfig {
    /// Selection the frames belong to.
    pub timeline: TimelineConfig,
    /// Halo bands every frame carries.
    pub band_count: usize,
}

/// Consumer of composed frames.
///
/// Ordering contract: within one play session `push_frame` is called with strictly increasing
/// `frame_number`. Sinks hold no animation state of their own.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> AuraResult<()> {
        let _ = cfg;
        Ok(())
    }
    /// Push one frame.
    fn push_frame(&mut self, frame_number: u64, frame: &AnimationFrame) -> AuraResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> AuraResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, AnimationFrame)>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(u64, AnimationFrame)] {
        &self.frames
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> AuraResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, frame_number: u64, frame: &AnimationFrame) -> AuraResult<()> {
        self.frames.push((frame_number, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> AuraResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Newline-delimited JSON sink: one frame object per line.
pub struct JsonLinesSink<W: std::io::Write> {
    out: W,
}

impl<W: std::io::Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[derive(serde::Serialize)]
struct FrameLine<'a> {
    frame_number: u64,
    frame: &'a AnimationFrame,
}

impl<W: std::io::Write> FrameSink for JsonLinesSink<W> {
    fn push_frame(&mut self, frame_number: u64, frame: &AnimationFrame) -> AuraResult<()> {
        serde_json::to_writer(
            &mut self.out,
            &FrameLine {
                frame_number,
                frame,
            },
        )?;
        writeln!(self.out).map_err(anyhow::Error::from)?;
        Ok(())
    }

    fn end(&mut self) -> AuraResult<()> {
        self.out.flush().map_err(anyhow::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/sink.rs"]
mod tests;

use std::collections::VecDeque;

/// Samples kept per rolling window.
pub const WINDOW_LEN: usize = 60;

/// Fixed-length window of recent samples.
#[derive(Clone, Debug, Default)]
pub(crate) struct RollingWindow {
    samples: VecDeque<f64>,
}

impl RollingWindow {
    pub(crate) fn push(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        if self.samples.len() == WINDOW_LEN {
            self.samples.pop_front();
        }
        self.samples.push_back(v);
    }

    pub(crate) fn len(&self) -> usize {
        self.samples.len()
    }

    pub(crate) fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
        }
    }

    pub(crate) fn max(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::max)
    }

    pub(crate) fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Rolling compute-latency and frame-rate windows kept by the scheduler.
///
/// Pure bookkeeping; nothing here feeds back into frame content.
#[derive(Clone, Debug, Default)]
pub struct TickDiagnostics {
    compute_ms: RollingWindow,
    fps: RollingWindow,
}

impl TickDiagnostics {
    /// Record one recompute's wall-clock cost.
    pub(crate) fn record_compute(&mut self, ms: f64) {
        self.compute_ms.push(ms);
    }

    /// Record the instantaneous rate implied by one tick delta. Zero deltas are skipped.
    pub(crate) fn record_delta(&mut self, delta_ms: f64) {
        if delta_ms > 0.0 {
            self.fps.push(1000.0 / delta_ms);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.compute_ms.clear();
        self.fps.clear();
    }

    /// Current window summary.
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            compute_samples: self.compute_ms.len(),
            mean_compute_ms: self.compute_ms.mean(),
            max_compute_ms: self.compute_ms.max(),
            fps_samples: self.fps.len(),
            mean_fps: self.fps.mean(),
        }
    }
}

/// Serializable summary of [`TickDiagnostics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DiagnosticsSnapshot {
    /// Compute samples in the window.
    pub compute_samples: usize,
    /// Mean recompute latency.
    pub mean_compute_ms: Option<f64>,
    /// Worst recompute latency.
    pub max_compute_ms: Option<f64>,
    /// Rate samples in the window.
    pub fps_samples: usize,
    /// Mean instantaneous frame rate.
    pub mean_fps: Option<f64>,
}

#[cfg(test)]
#[path = "../../tests/unit/playback/stats.rs"]
mod tests;

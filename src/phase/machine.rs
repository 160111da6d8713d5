use std::sync::Arc;

use crate::foundation::error::AuraResult;
use crate::phase::choreography::{ChoreographyDescriptor, ChoreographyTable};
use crate::phase::context::AnimationContext;
use crate::phase::registry::{PhaseDescriptor, PhaseId, PhaseRegistry};

/// A phase switch reported by [`PhaseMachine::set_phase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PhaseChange {
    /// Phase before the switch.
    pub from: PhaseId,
    /// Phase after the switch.
    pub to: PhaseId,
}

/// Holds the current narrative phase.
///
/// Phases only change when the host calls [`PhaseMachine::set_phase`]; there are no timers and
/// no automatic progression.
#[derive(Clone, Debug)]
pub struct PhaseMachine {
    registry: Arc<PhaseRegistry>,
    choreography: Arc<ChoreographyTable>,
    current: PhaseId,
}

impl PhaseMachine {
    /// Machine starting in [`PhaseId::Idle`].
    pub fn new(registry: Arc<PhaseRegistry>, choreography: Arc<ChoreographyTable>) -> Self {
        Self {
            registry,
            choreography,
            current: PhaseId::Idle,
        }
    }

    /// Machine over the built-in registry and choreography.
    pub fn builtin() -> Self {
        Self::new(
            Arc::new(PhaseRegistry::builtin()),
            Arc::new(ChoreographyTable::builtin()),
        )
    }

    /// Switch to `id`. Returns `None` when already there.
    pub fn set_phase(&mut self, id: PhaseId) -> Option<PhaseChange> {
        if id == self.current {
            return None;
        }
        let change = PhaseChange {
            from: self.current,
            to: id,
        };
        self.current = id;
        tracing::debug!(from = %change.from, to = %change.to, "phase change");
        Some(change)
    }

    /// Switch by name, e.g. `"dose_reveal"`.
    pub fn set_phase_named(&mut self, name: &str) -> AuraResult<Option<PhaseChange>> {
        Ok(self.set_phase(name.parse()?))
    }

    /// Current phase.
    pub fn current(&self) -> PhaseId {
        self.current
    }

    /// Descriptor of the current phase.
    pub fn descriptor(&self) -> &PhaseDescriptor {
        self.registry.get(self.current)
    }

    /// Radar axis highlighted by the current phase.
    pub fn highlight_axis(&self) -> Option<&str> {
        self.descriptor().highlight_axis.as_deref()
    }

    /// Strain highlighted by the current phase.
    pub fn highlight_strain(&self) -> Option<&str> {
        self.descriptor().highlight_strain.as_deref()
    }

    /// Message copy key of the current phase.
    pub fn message_id(&self) -> Option<&str> {
        self.descriptor().message_id.as_deref()
    }

    /// Star preset of the current phase.
    pub fn star_preset_id(&self) -> Option<&str> {
        self.descriptor().star_preset_id.as_deref()
    }

    /// Biases of the current phase.
    pub fn animation_context(&self) -> AnimationContext {
        self.descriptor().animation_context()
    }

    /// Biases of any phase.
    pub fn context_of(&self, id: PhaseId) -> AnimationContext {
        self.registry.get(id).animation_context()
    }

    /// Choreography for `from -> to`, falling back to the default.
    pub fn choreography(&self, from: PhaseId, to: PhaseId) -> ChoreographyDescriptor {
        self.choreography.resolve(from, to)
    }

    /// Registry backing this machine.
    pub fn registry(&self) -> &PhaseRegistry {
        &self.registry
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/phase/machine.rs"]
mod tests;

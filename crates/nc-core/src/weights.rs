//! Multiplicative per-event weight components.

use serde::{Deserialize, Serialize};

/// The independent weight factors attached to a canonical event.
///
/// Components are set by different layers (joint-input normalization,
/// reweight engines, analysis customization, prior processing passes) and
/// never read each other; only the product matters downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventWeights {
    /// Joint-input scale factor times any generator-native per-event
    /// weight; owned by the input handler.
    pub input: f64,
    /// Reweight-engine response for the current parameter set.
    pub generator: f64,
    /// Free slot for sample-specific tuning.
    pub custom: f64,
    /// Reweight value carried over from a prior processing pass (read back
    /// from canonical interchange files).
    pub saved_reweight: f64,
}

impl Default for EventWeights {
    fn default() -> Self {
        Self { input: 1.0, generator: 1.0, custom: 1.0, saved_reweight: 1.0 }
    }
}

impl EventWeights {
    /// Restore every component to 1.0.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Combined event weight: the product of all components.
    pub fn total(&self) -> f64 {
        self.input * self.generator * self.custom * self.saved_reweight
    }
}

//! The public input-handler boundary.

use crate::joint::JointInputs;
use nc_core::{CanonicalEvent, Result};
use nc_io::Spectrum;

/// Common facade every generator input handler presents to the
/// measurement layer.
///
/// Handlers are single-threaded by construction: one shared
/// [`CanonicalEvent`] is mutated in place on every read, so `&mut self`
/// on the event accessors is load-bearing, not incidental.
pub trait InputHandler {
    /// Handler ID this input was registered under.
    fn name(&self) -> &str;

    /// Total number of iterable events.
    fn n_events(&self) -> usize;

    /// Fully populated canonical event for a combined entry index.
    ///
    /// Returns `Ok(None)` past the end of the input.
    fn nuisance_event(&mut self, entry: usize) -> Result<Option<&CanonicalEvent>>;

    /// Lightweight read: only mode/probe/weight information is
    /// guaranteed to be valid. Default falls back to the full read.
    fn base_event(&mut self, entry: usize) -> Result<Option<&CanonicalEvent>> {
        self.nuisance_event(entry)
    }

    /// Clamp the iterable event count to `cap`.
    ///
    /// Scale factors keep reflecting the full registered statistics, so
    /// truncating a joint input is refused (see
    /// [`crate::joint::JointInputs::truncate`]).
    fn truncate(&mut self, cap: usize) -> Result<()>;

    /// Combined flux spectrum these events were generated with.
    fn flux_spectrum(&self) -> &Spectrum;

    /// Combined predicted event-rate spectrum.
    fn event_spectrum(&self) -> &Spectrum;

    /// Cross-section spectrum: event rate divided by flux, bin by bin.
    fn xsec_spectrum(&self) -> Spectrum {
        self.event_spectrum()
            .divide(self.flux_spectrum())
            .expect("flux and event-rate binning verified at registration")
    }

    /// Integrated flux between two probe energies, with linear
    /// apportionment of partially covered boundary bins. `None` bounds
    /// mean the spectrum edges.
    fn total_integrated_flux(&self, low: Option<f64>, high: Option<f64>) -> f64 {
        self.flux_spectrum().integral_between(low, high, true)
    }

    /// Predicted event rate between two probe energies, integrated over
    /// whole bins only (the bins containing `low` and `high` are counted
    /// in full).
    fn predicted_event_rate(&self, low: Option<f64>, high: Option<f64>) -> f64 {
        let spectrum = self.event_spectrum();
        let lo_bin = low.and_then(|x| spectrum.find_bin(x)).unwrap_or(0);
        let hi_bin = high
            .and_then(|x| spectrum.find_bin(x))
            .unwrap_or_else(|| spectrum.n_bins().saturating_sub(1));
        spectrum.integral_bins(lo_bin, hi_bin, true)
    }
}

/// State shared by every handler implementation: the handler name, the
/// reusable canonical event, and the joint-input registry.
#[derive(Debug)]
pub struct HandlerCore {
    /// Handler ID.
    pub name: String,
    /// The one canonical event reused across all reads.
    pub event: CanonicalEvent,
    /// Joint-input registry (single files are a registry of one).
    pub joint: JointInputs,
}

impl HandlerCore {
    /// Wrap a finalized registry under a handler name.
    pub fn new(name: impl Into<String>, mut joint: JointInputs) -> Self {
        let name = name.into();
        joint.set_handle(&name);
        Self { name, event: CanonicalEvent::new(), joint }
    }

    /// Iterable event count.
    pub fn n_events(&self) -> usize {
        self.joint.total_events()
    }

    /// Per-entry joint scale factor.
    pub fn input_weight(&self, entry: usize) -> f64 {
        self.joint.input_weight(entry)
    }

    /// Clamp the iterable event count; refuses joint inputs.
    pub fn truncate(&mut self, cap: usize) -> Result<()> {
        self.joint.truncate(cap)
    }
}

//! Joint-input registration and per-file scale factors.
//!
//! When several independently generated files are read as one logical
//! event sequence, each file's events must be re-weighted so that every
//! input contributes in proportion to its own predicted event rate rather
//! than to its raw simulated statistics. Registration accumulates per-file
//! event counts and spectra; finalization derives one immutable scale
//! factor per file.

use nc_core::{Error, Result};
use nc_io::Spectrum;
use std::cell::Cell;

/// One registered input file.
#[derive(Debug, Clone)]
pub struct JointInput {
    /// Path the file was registered from (diagnostics only).
    pub path: String,
    /// Simulated events in this file.
    pub n_events: usize,
    /// First entry of this file in the combined index space.
    pub low: usize,
    /// One past the last entry of this file in the combined index space.
    pub high: usize,
    /// This file's flux spectrum.
    pub flux: Spectrum,
    /// This file's predicted event-rate spectrum.
    pub event_rate: Spectrum,
}

impl JointInput {
    fn contains(&self, entry: usize) -> bool {
        entry >= self.low && entry < self.high
    }
}

/// Accumulates files for the default normalization strategy.
#[derive(Debug, Default)]
pub struct JointInputBuilder {
    inputs: Vec<JointInput>,
    total: usize,
}

impl JointInputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one file's event count and spectra.
    pub fn register(
        &mut self,
        path: impl Into<String>,
        n_events: usize,
        flux: Spectrum,
        event_rate: Spectrum,
    ) -> Result<()> {
        let path = path.into();
        if n_events == 0 {
            return Err(Error::Config(format!("'{path}' contains 0 events")));
        }
        if flux.bin_edges != event_rate.bin_edges {
            return Err(Error::Config(format!(
                "'{path}': flux and event-rate spectra are binned differently"
            )));
        }
        let low = self.total;
        self.total += n_events;
        self.inputs.push(JointInput {
            path,
            n_events,
            low,
            high: self.total,
            flux,
            event_rate,
        });
        Ok(())
    }

    /// Number of files registered so far.
    pub fn n_registered(&self) -> usize {
        self.inputs.len()
    }

    /// Derive scale factors and freeze the registry.
    ///
    /// For each file i:
    /// `scale_i = (N_total / R_total) * (R_i / n_i)`
    /// where `R` is a width-weighted event-rate integral. The first factor
    /// converts one simulated event into its share of the combined rate;
    /// the second re-normalizes file i's local event density so inputs
    /// with different raw statistics for the same physical rate do not
    /// bias the merged sample.
    pub fn finalize(self) -> Result<JointInputs> {
        if self.inputs.is_empty() {
            return Err(Error::Config("no input files registered".into()));
        }

        let mut flux = self.inputs[0].flux.clone();
        let mut event_rate = self.inputs[0].event_rate.clone();
        for input in &self.inputs[1..] {
            flux.add(&input.flux).map_err(|e| {
                Error::Config(format!("'{}': flux binning differs across joint inputs: {e}", input.path))
            })?;
            event_rate.add(&input.event_rate).map_err(|e| {
                Error::Config(format!(
                    "'{}': event-rate binning differs across joint inputs: {e}",
                    input.path
                ))
            })?;
        }

        let rate_total = event_rate.integral_width();
        if rate_total <= 0.0 {
            return Err(Error::Normalization(
                "combined event-rate integral is not positive".into(),
            ));
        }

        let n_total = self.total as f64;
        let scales = self
            .inputs
            .iter()
            .map(|inp| {
                n_total / rate_total * inp.event_rate.integral_width() / inp.n_events as f64
            })
            .collect();

        let joint = self.inputs.len() > 1;
        let registry = JointInputs {
            inputs: self.inputs,
            scales,
            flux,
            event_rate,
            total_events: self.total,
            raw_total_events: self.total,
            joint,
            cursor: Cell::new(0),
        };
        registry.log_summary();
        Ok(registry)
    }
}

/// Frozen joint-input registry: combined spectra, per-file index ranges,
/// and per-file scale factors.
#[derive(Debug)]
pub struct JointInputs {
    inputs: Vec<JointInput>,
    scales: Vec<f64>,
    flux: Spectrum,
    event_rate: Spectrum,
    total_events: usize,
    raw_total_events: usize,
    joint: bool,
    // Sequential-read optimization; see file_index().
    cursor: Cell<usize>,
}

impl JointInputs {
    pub(crate) fn from_parts(
        inputs: Vec<JointInput>,
        scales: Vec<f64>,
        flux: Spectrum,
        event_rate: Spectrum,
        joint: bool,
    ) -> Self {
        let total: usize = inputs.iter().map(|i| i.n_events).sum();
        Self {
            inputs,
            scales,
            flux,
            event_rate,
            total_events: total,
            raw_total_events: total,
            joint,
            cursor: Cell::new(0),
        }
    }

    fn log_summary(&self) {
        tracing::info!(
            entries = self.total_events,
            files = self.inputs.len(),
            event_integral = self.event_rate.integral_width(),
            flux_integral = self.flux.integral_width(),
            "joint inputs registered"
        );
    }

    /// Number of registered files.
    pub fn n_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Total events available for iteration (may be truncated).
    pub fn total_events(&self) -> usize {
        self.total_events
    }

    /// Total registered events, ignoring truncation.
    pub fn raw_total_events(&self) -> usize {
        self.raw_total_events
    }

    /// The registered file at `i`.
    pub fn input(&self, i: usize) -> &JointInput {
        &self.inputs[i]
    }

    /// Scale factor for file `i`.
    pub fn scale_factor(&self, i: usize) -> f64 {
        self.scales[i]
    }

    /// Combined flux spectrum.
    pub fn flux(&self) -> &Spectrum {
        &self.flux
    }

    /// Combined event-rate spectrum.
    pub fn event_rate(&self) -> &Spectrum {
        &self.event_rate
    }

    /// Rename the combined spectra after the owning handler.
    pub fn set_handle(&mut self, handle: &str) {
        self.flux.name = format!("{handle}_FLUX");
        self.flux.title = self.flux.name.clone();
        self.event_rate.name = format!("{handle}_EVT");
        self.event_rate.title = self.event_rate.name.clone();
    }

    /// Clamp the number of iterable events to `cap`.
    ///
    /// Scale factors deliberately keep reflecting the full registered
    /// statistics; with more than one file that would bias the combined
    /// spectra measurably, so truncating a joint input is refused.
    pub fn truncate(&mut self, cap: usize) -> Result<()> {
        if self.inputs.len() > 1 {
            return Err(Error::Normalization(
                "cannot truncate a joint input: per-file scale factors are not recomputed".into(),
            ));
        }
        if cap < self.total_events {
            tracing::info!(cap, total = self.total_events, "truncating input");
            self.total_events = cap;
        }
        Ok(())
    }

    /// Which registered file does this combined entry fall in?
    ///
    /// A monotonic cursor makes sequential access O(1) amortized; any miss
    /// falls back to an exact binary search over the (sorted, disjoint,
    /// total) ranges, so random access stays correct in every cursor
    /// state.
    pub fn file_index(&self, entry: usize) -> usize {
        let cur = self.cursor.get();
        if self.inputs[cur].contains(entry) {
            return cur;
        }
        if cur + 1 < self.inputs.len() && self.inputs[cur + 1].contains(entry) {
            self.cursor.set(cur + 1);
            return cur + 1;
        }
        let idx = self
            .inputs
            .partition_point(|inp| inp.high <= entry)
            .min(self.inputs.len() - 1);
        self.cursor.set(idx);
        idx
    }

    /// Per-entry joint weight: the owning file's scale factor, or 1.0 when
    /// only one file is registered under the default strategy.
    pub fn input_weight(&self, entry: usize) -> f64 {
        if !self.joint {
            return 1.0;
        }
        self.scales[self.file_index(entry)]
    }
}

//! Spline-parameterized input handler.
//!
//! A spline file is a canonical flat tree with an entry-parallel tree of
//! response-spline coefficient blocks. Events read exactly like flat
//! inputs; the coefficients ride alongside for the reweight machinery.

use crate::handler::{HandlerCore, InputHandler};
use crate::joint::JointInputBuilder;
use nc_core::{CanonicalEvent, Error, Result};
use nc_io::records::flat::{FlatRecord, SplineBlock, EVENT_NAME, FLUX_NAME, SPLINE_TREE_NAME, TREE_NAME};
use nc_io::{SampleFile, Spectrum};
use std::path::PathBuf;

/// Reads spline-parameterized canonical files.
pub struct SplineInput {
    core: HandlerCore,
    entries: Vec<FlatRecord>,
    coeffs: Vec<SplineBlock>,
    starting_weights: Vec<f64>,
}

impl SplineInput {
    /// Open a spline file. Splines are written per file, so joint groups
    /// are not supported here.
    pub fn open(handle: &str, files: &[PathBuf]) -> Result<Self> {
        let [path] = files else {
            return Err(Error::Config(
                "spline inputs take exactly one file; joint spline groups are not supported"
                    .into(),
            ));
        };
        tracing::info!(handle, "creating spline input handler");

        let file = SampleFile::open(path)?;
        let flux = file.spectrum(FLUX_NAME).cloned()?;
        let event_rate = file.spectrum(EVENT_NAME).cloned()?;
        let entries: Vec<FlatRecord> = file.tree(TREE_NAME)?;
        let coeffs: Vec<SplineBlock> = file.tree(SPLINE_TREE_NAME)?;
        if entries.is_empty() {
            return Err(Error::Config(format!(
                "tree '{TREE_NAME}' in '{}' holds 0 events",
                path.display()
            )));
        }
        if coeffs.len() != entries.len() {
            return Err(Error::Config(format!(
                "'{}': {} events but {} spline blocks; the trees must be entry-parallel",
                path.display(),
                entries.len(),
                coeffs.len()
            )));
        }

        let mut builder = JointInputBuilder::new();
        builder.register(path.display().to_string(), entries.len(), flux, event_rate)?;
        let core = HandlerCore::new(handle, builder.finalize()?);

        // Per-entry starting weights are frozen at construction so the
        // reweight loop never touches the registry.
        let starting_weights =
            (0..entries.len()).map(|j| core.joint.input_weight(j)).collect();

        Ok(Self { core, entries, coeffs, starting_weights })
    }

    /// Spline coefficients for one entry.
    pub fn spline_coeffs(&self, entry: usize) -> Option<&[f64]> {
        self.coeffs.get(entry).map(|b| b.coeffs.as_slice())
    }

    /// Input weight frozen at construction time for one entry.
    pub fn starting_weight(&self, entry: usize) -> Option<f64> {
        self.starting_weights.get(entry).copied()
    }
}

impl InputHandler for SplineInput {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn n_events(&self) -> usize {
        self.core.n_events()
    }

    fn nuisance_event(&mut self, entry: usize) -> Result<Option<&CanonicalEvent>> {
        if entry >= self.core.n_events() {
            return Ok(None);
        }
        let rec = &self.entries[entry];
        let ev = &mut self.core.event;
        ev.reset();
        rec.fill_event(ev);
        ev.cache_probe();
        ev.weights.saved_reweight = rec.rw_weight;
        ev.weights.input = rec.input_weight * self.starting_weights[entry];
        Ok(Some(&self.core.event))
    }

    fn truncate(&mut self, cap: usize) -> Result<()> {
        self.core.truncate(cap)
    }

    fn flux_spectrum(&self) -> &Spectrum {
        self.core.joint.flux()
    }

    fn event_spectrum(&self) -> &Spectrum {
        self.core.joint.event_rate()
    }
}

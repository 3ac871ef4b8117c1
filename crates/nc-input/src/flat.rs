//! Generic input handler for canonical flat-tree files.
//!
//! Any handler's output can be persisted with [`write_canonical_file`]
//! and read back here with no generator code involved, so the canonical
//! representation doubles as an interchange format.

use crate::handler::{HandlerCore, InputHandler};
use crate::joint::JointInputBuilder;
use nc_core::{CanonicalEvent, Error, Result};
use nc_io::records::flat::{FlatRecord, EVENT_NAME, FLUX_NAME, TREE_NAME};
use nc_io::{SampleFile, Spectrum};
use std::path::{Path, PathBuf};

/// Reads canonical flat-tree files.
pub struct FlatInput {
    core: HandlerCore,
    entries: Vec<FlatRecord>,
}

fn load_flat(path: &Path) -> Result<(Vec<FlatRecord>, Spectrum, Spectrum)> {
    let file = SampleFile::open(path)?;
    let flux = file.spectrum(FLUX_NAME).cloned().map_err(|_| {
        Error::Config(format!(
            "'{}' doesn't contain '{FLUX_NAME}'; was this file written by the canonical writer?",
            path.display()
        ))
    })?;
    let event_rate = file.spectrum(EVENT_NAME).cloned().map_err(|_| {
        Error::Config(format!(
            "'{}' doesn't contain '{EVENT_NAME}'; was this file written by the canonical writer?",
            path.display()
        ))
    })?;
    let entries: Vec<FlatRecord> = file.tree(TREE_NAME)?;
    if entries.is_empty() {
        return Err(Error::Config(format!(
            "tree '{TREE_NAME}' in '{}' holds 0 events",
            path.display()
        )));
    }
    Ok((entries, flux, event_rate))
}

/// Write canonical records and their spectra as a flat-tree sample file.
pub fn write_canonical_file(
    path: impl AsRef<Path>,
    records: &[FlatRecord],
    flux: &Spectrum,
    event_rate: &Spectrum,
) -> Result<()> {
    let mut file = SampleFile::create();
    file.insert_spectrum(flux.renamed(FLUX_NAME));
    file.insert_spectrum(event_rate.renamed(EVENT_NAME));
    file.insert_tree(TREE_NAME, records)?;
    file.write(path)
}

impl FlatInput {
    /// Open one or more canonical flat-tree files as a single (joint)
    /// input.
    pub fn open(handle: &str, files: &[PathBuf]) -> Result<Self> {
        tracing::info!(handle, "creating flat-tree input handler");
        let mut builder = JointInputBuilder::new();
        let mut entries = Vec::new();
        for path in files {
            let (tree, flux, event_rate) = load_flat(path)?;
            builder.register(path.display().to_string(), tree.len(), flux, event_rate)?;
            entries.extend(tree);
        }
        let core = HandlerCore::new(handle, builder.finalize()?);
        Ok(Self { core, entries })
    }

    fn fill(&mut self, entry: usize) {
        let rec = &self.entries[entry];
        let ev = &mut self.core.event;
        ev.reset();
        // Stored stacks were ordered when written; no re-partition needed.
        rec.fill_event(ev);
        ev.cache_probe();
        ev.weights.saved_reweight = rec.rw_weight;
        ev.weights.input = rec.input_weight;
    }
}

impl InputHandler for FlatInput {
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
        self.fill(entry);
        let scale = self.core.input_weight(entry);
        self.core.event.weights.input *= scale;
        Ok(Some(&self.core.event))
    }

    fn base_event(&mut self, entry: usize) -> Result<Option<&CanonicalEvent>> {
        if entry >= self.core.n_events() {
            return Ok(None);
        }
        let rec = &self.entries[entry];
        let (mode, rw, input) = (rec.mode, rec.rw_weight, rec.input_weight);
        let scale = self.core.input_weight(entry);
        let ev = &mut self.core.event;
        ev.reset();
        ev.mode = mode;
        ev.weights.saved_reweight = rw;
        ev.weights.input = input * scale;
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

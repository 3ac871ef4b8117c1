//! Histogram-only input handler.
//!
//! For externally supplied predictions there is no event tree at all,
//! just flux and event-rate spectra. One stub event is synthesized per
//! event-rate bin: a beam probe along z at the bin center carrying the
//! bin content as its weight. Downstream code that only consumes spectra
//! and weights works unchanged; anything inspecting hadrons will find an
//! empty final state.

use crate::handler::{HandlerCore, InputHandler};
use crate::joint::JointInputBuilder;
use crate::loader::{EVENT_FRAGMENT, FLUX_FRAGMENT};
use nc_core::{modes, CanonicalEvent, Error, FourVector, ParticleState, Result};
use nc_io::{SampleFile, Spectrum};
use std::path::PathBuf;

/// Synthesizes weight-carrying stub events from spectra.
pub struct HistoInput {
    core: HandlerCore,
    // (probe energy, weight) per synthesized entry.
    points: Vec<(f64, f64)>,
    probe_pdg: i32,
}

impl HistoInput {
    /// Open one or more spectra-only sample files.
    pub fn open(handle: &str, files: &[PathBuf]) -> Result<Self> {
        tracing::info!(handle, "creating histogram input handler");
        let mut builder = JointInputBuilder::new();
        let mut points = Vec::new();
        for path in files {
            let file = SampleFile::open(path)?;
            let flux = file.spectrum_matching(FLUX_FRAGMENT).cloned().ok_or_else(|| {
                Error::Config(format!(
                    "'{}' doesn't contain a flux spectrum",
                    path.display()
                ))
            })?;
            let event_rate =
                file.spectrum_matching(EVENT_FRAGMENT).cloned().ok_or_else(|| {
                    Error::Config(format!(
                        "'{}' doesn't contain an event-rate spectrum",
                        path.display()
                    ))
                })?;
            for i in 0..event_rate.n_bins() {
                points.push((event_rate.bin_center(i), event_rate.contents[i]));
            }
            builder.register(
                path.display().to_string(),
                event_rate.n_bins(),
                flux,
                event_rate,
            )?;
        }
        let core = HandlerCore::new(handle, builder.finalize()?);
        Ok(Self { core, points, probe_pdg: 14 })
    }

    /// Override the synthesized beam-probe PDG (default muon neutrino).
    pub fn set_probe_pdg(&mut self, pdg: i32) {
        self.probe_pdg = pdg;
    }
}

impl InputHandler for HistoInput {
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
        let (energy, weight) = self.points[entry];
        let probe_pdg = self.probe_pdg;
        let scale = self.core.input_weight(entry);
        let ev = &mut self.core.event;
        ev.reset();
        ev.mode = modes::CCQE;
        ev.event_no = entry as u32;
        // Massless beam probe along z.
        ev.push_particle(
            FourVector::new(0.0, 0.0, energy, energy),
            probe_pdg,
            ParticleState::Initial,
            true,
        );
        ev.order_stack();
        ev.cache_probe();
        ev.weights.input = weight * scale;
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

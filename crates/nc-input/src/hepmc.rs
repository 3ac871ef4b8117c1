//! NuHepMC input handler.

use crate::handler::{HandlerCore, InputHandler};
use crate::joint::JointInputBuilder;
use crate::loader::load_sample;
use nc_core::{CanonicalEvent, FourVector, ParticleState, Result};
use nc_io::records::hepmc::{status, HepmcRecord, TREE_NAME};
use nc_io::Spectrum;
use std::path::PathBuf;

/// Reads converted NuHepMC sample files. Process IDs are already in
/// canonical numbering and pass straight through; only the particle
/// status codes need mapping. Momenta are GeV natively.
pub struct HepmcInput {
    core: HandlerCore,
    entries: Vec<HepmcRecord>,
}

/// Map a NuHepMC status code onto the canonical taxonomy.
pub fn hepmc_particle_state(code: i32) -> ParticleState {
    match code {
        status::FINAL => ParticleState::Final,
        status::DECAYED => ParticleState::Fsi,
        status::BEAM | status::STRUCK_NUCLEON => ParticleState::Initial,
        status::TARGET => ParticleState::NuclearInitial,
        _ => ParticleState::Undefined,
    }
}

impl HepmcInput {
    /// Open one or more NuHepMC sample files as a single (joint) input.
    pub fn open(handle: &str, files: &[PathBuf]) -> Result<Self> {
        tracing::info!(handle, "creating NuHepMC input handler");
        let mut builder = JointInputBuilder::new();
        let mut entries = Vec::new();
        for path in files {
            let (tree, flux, event_rate) = load_sample::<HepmcRecord>(
                path,
                TREE_NAME,
                "convert the HepMC stream and attach flux/event-rate spectra first",
            )?;
            builder.register(path.display().to_string(), tree.len(), flux, event_rate)?;
            entries.extend(tree);
        }
        let core = HandlerCore::new(handle, builder.finalize()?);
        Ok(Self { core, entries })
    }

    fn fill_kinematics(&mut self, entry: usize) {
        let rec = &self.entries[entry];
        let ev = &mut self.core.event;
        ev.reset();

        ev.mode = rec.proc_id;
        ev.event_no = rec.event_no;

        let npart = rec.parts.len();
        if npart > ev.capacity() {
            tracing::warn!(npart, "HepMC event exceeds particle stack; expanding");
            ev.expand_stack(npart);
        }

        for part in &rec.parts {
            let state = hepmc_particle_state(part.status);
            let mom = FourVector::new(
                part.p[0] * 1.0e3,
                part.p[1] * 1.0e3,
                part.p[2] * 1.0e3,
                part.p[3] * 1.0e3,
            );
            ev.push_particle(mom, part.pdg, state, true);
        }

        ev.order_stack();
        ev.cache_probe();
    }
}

impl InputHandler for HepmcInput {
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
        self.fill_kinematics(entry);
        let scale = self.core.input_weight(entry);
        self.core.event.weights.input *= scale;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_map() {
        assert_eq!(hepmc_particle_state(status::FINAL), ParticleState::Final);
        assert_eq!(hepmc_particle_state(status::BEAM), ParticleState::Initial);
        assert_eq!(hepmc_particle_state(status::STRUCK_NUCLEON), ParticleState::Initial);
        assert_eq!(hepmc_particle_state(status::TARGET), ParticleState::NuclearInitial);
        assert_eq!(hepmc_particle_state(status::DECAYED), ParticleState::Fsi);
        assert_eq!(hepmc_particle_state(1234), ParticleState::Undefined);
    }
}
